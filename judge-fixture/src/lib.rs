//! Judge-style input/output testing for Rust programs
//!
//! A [`Fixture`] runs a program with its standard input fed from a file (or a string) and its
//! standard output captured, then compares the captured output line by line against an expected
//! output file. The files are looked up by name anywhere below a search root, so a test only needs
//! to name the pair:
//!
//! ```rust
//! use std::io::{BufRead, Write};
//!
//! use judge_fixture::{Console, Fixture, Program, Target};
//!
//! #[derive(Default)]
//! struct Square;
//!
//! impl Program for Square {
//!     fn run(&mut self, console: &mut Console<'_>) -> anyhow::Result<()> {
//!         let mut line = String::new();
//!         console.read_line(&mut line)?;
//!         let n: i64 = line.trim().parse()?;
//!         writeln!(console, "{}", n * n)?;
//!         Ok(())
//!     }
//! }
//!
//! let fixture = Fixture::console_validating(Target::<Square>::program());
//! fixture.validate_string("5\n", "25\n").unwrap();
//! ```
//!
//! With files the call is `fixture.validate_files("a.inp", "a.oup")`.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(test(attr(warn(unused))))]

pub mod comparator;
pub mod console;
pub mod envs;
pub mod error;
pub mod fixture;
mod format;
pub mod interceptor;
pub mod invoker;
pub mod locator;

pub use comparator::{Comparison, Mismatch, OutputComparator};
pub use console::{Console, Program};
pub use error::Error;
pub use fixture::{Fixture, Report};
pub use interceptor::{CapturedOutput, InputSource, Interception, Redirect};
pub use invoker::{EntryPoint, Invoke, Target, DEFAULT_METHODS};
pub use locator::{Directory, FileLocator, FileResolver};
