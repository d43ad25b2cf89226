pub mod account_report;
