//! # mealdesk Entry Point
//!
//! The actual setup is in lib.rs for better testability.

fn main() {
    if let Err(e) = mealdesk_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
