use std::io::BufReader;

use decoder::runtime::{boot, run};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let config = boot::boot()?;
    let stdout = std::io::stdout();
    run::run(&config, BufReader::new(std::io::stdin()), stdout.lock())?;
    Ok(())
}
