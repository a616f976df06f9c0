use std::process;

fn main() {
    if let Err(e) = ynab_email_reports::run() {
        eprintln!("Error: {}", e);
        for cause in e.iter().skip(1) {
            eprintln!("  caused by: {}", cause);
        }
        process::exit(1);
    }
}
