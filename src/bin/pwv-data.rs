use pwv_trans::{DateFilter, MeasuredLoader, SeriesLoader};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "pwv-data",
    about = "Locally available PWV measurements and models"
)]
struct Opt {
    /// Path to the PWV model tables repository
    #[structopt(long, default_value = ".")]
    path: String,
    /// Inspect the measured instead of the modeled PWV
    #[structopt(short, long)]
    measured: bool,
    /// List the years with locally available data
    #[structopt(long)]
    years: bool,
    /// Restrict the listing to a year
    #[structopt(short, long)]
    year: Option<i32>,
    /// Restrict the listing to a month
    #[structopt(long)]
    month: Option<u32>,
    /// Restrict the listing to a day
    #[structopt(short, long)]
    day: Option<u32>,
    /// Restrict the listing to an hour (24-hour format)
    #[structopt(long)]
    hour: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let filter = DateFilter {
        year: opt.year,
        month: opt.month,
        day: opt.day,
        hour: opt.hour,
    };

    if opt.measured {
        let measured = MeasuredLoader::default().data_path(&opt.path).load()?;
        if opt.years {
            println!("{:?}", measured.years());
            return Ok(());
        }
        measured.filter(&filter)?.summary();
    } else {
        let series = SeriesLoader::default().data_path(&opt.path).load()?;
        if opt.years {
            println!("{:?}", series.years());
            return Ok(());
        }
        println!("{:^24}  {:>8}", "DATE", "PWV [mm]");
        for sample in series.filter(&filter)? {
            println!("{:24}  {:>8.2}", sample.date.to_string(), sample.pwv);
        }
    }
    Ok(())
}
