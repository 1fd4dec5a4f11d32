use std::fs::File;

use anyhow::Context;
use chrono::{DateTime, Utc};
use pwv_trans::{GridLoader, SeriesLoader, Transmission};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "pwv-trans",
    about = "Modeled atmospheric transmission due to precipitable water vapor"
)]
struct Opt {
    /// Date and time of the observation (RFC 3339, with an explicit UTC offset)
    date: String,
    /// Airmass of the observation
    #[structopt(short, long, default_value = "1")]
    airmass: f64,
    /// Path to the PWV model tables repository
    #[structopt(long, default_value = ".")]
    path: String,
    /// Save the transmission spectrum to a CSV file
    #[structopt(long)]
    csv: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let date = DateTime::parse_from_rfc3339(&opt.date)
        .with_context(|| {
            format!(
                "`{}` is not an RFC 3339 date with an explicit UTC offset",
                opt.date
            )
        })?
        .with_timezone(&Utc);

    let model = Transmission::new(
        SeriesLoader::default().data_path(&opt.path).load()?,
        GridLoader::default().data_path(&opt.path).load()?,
    );
    let spectrum = model.at(date, opt.airmass)?;

    match opt.csv {
        Some(filename) => {
            spectrum.to_csv(File::create(&filename)?)?;
            println!("Transmission spectrum saved to {}", filename);
        }
        None => {
            println!("{:>12}  {:>12}", "WAVELENGTH", "TRANSMISSION");
            for (wavelength, transmission) in spectrum.iter() {
                println!("{:>12.1}  {:>12.6}", wavelength, transmission);
            }
        }
    }
    Ok(())
}
