#![cfg(unix)]

mod common;
mod test_check;
mod test_run;
mod test_suite;
