use std::io::BufReader;

use meridian::uci::UciDriver;

fn main() {
    // Diagnostics go to stderr; stdout stays protocol-clean.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let stdin = std::io::stdin();
    let mut driver = UciDriver::new();
    driver.run(BufReader::new(stdin.lock()));
}
