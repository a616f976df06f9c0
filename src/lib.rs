#![warn(clippy::all)]

#[macro_use]
extern crate error_chain;

mod budget_data_processor;
mod budget_formatter;
mod cli;
mod constants;
mod email_sender;
mod models;
mod report_generator;
mod report_mailer;
mod report_renderer;
mod scheduler;
#[cfg(test)]
mod test_support;
mod types;
mod utilities;
mod ynab_client;

mod errors {
    error_chain! {}
}

pub use cli::run;
pub use errors::Error;
