use clap::Parser;

use authz_gate::Cli;

fn main() {
    let cli = Cli::parse();

    let reports = match authz_gate::run(&cli) {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("authz-bench: {}", e);
            if let Some(source) = std::error::Error::source(&e) {
                eprintln!("  caused by: {}", source);
            }
            std::process::exit(e.exit_code());
        }
    };

    match serde_json::to_string_pretty(&reports) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("authz-bench: failed to render results: {}", e);
            std::process::exit(1);
        }
    }
}
