//! The input/output handle handed to the program under test

use std::io::{self, BufRead, Read, Write};

/// A program which can be run by a [`crate::Fixture`]
///
/// This is the directly executable capability of a target. If a type implements `Program`, its
/// [`Program::run`] method is always preferred over named entry points registered with
/// [`crate::Target::entry_point`].
///
/// The program reads its input from and writes its output to the [`Console`]. Returning an error
/// fails the test with exactly this error.
pub trait Program {
    /// Run the program to completion
    fn run(&mut self, console: &mut Console<'_>) -> anyhow::Result<()>;
}

/// The standard input and output of the program under test
///
/// `Console` implements [`Read`], [`BufRead`] and [`Write`], so the usual `read_line`, `lines`
/// and `writeln!` work directly on it.
pub struct Console<'a> {
    input: &'a mut dyn BufRead,
    output: &'a mut dyn Write,
    process_wide: bool,
}

impl<'a> Console<'a> {
    /// Create a new `Console` from any input and output
    pub fn new(input: &'a mut dyn BufRead, output: &'a mut dyn Write) -> Self {
        Self {
            input,
            output,
            process_wide: false,
        }
    }

    /// A `Console` which reads from and writes to the redirected process-wide streams
    pub(crate) fn process_wide(input: &'a mut dyn BufRead, output: &'a mut dyn Write) -> Self {
        Self {
            input,
            output,
            process_wide: true,
        }
    }

    /// The input of the program
    pub fn input(&mut self) -> &mut dyn BufRead {
        self.input
    }

    /// The output of the program
    pub fn output(&mut self) -> &mut dyn Write {
        self.output
    }

    /// Return true if the real `stdin` and `stdout` of the process are redirected, too
    ///
    /// Only then can a program use [`std::io::stdin`] and [`std::io::stdout`] directly and still
    /// have its output captured.
    pub fn is_process_wide(&self) -> bool {
        self.process_wide
    }
}

impl Read for Console<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl BufRead for Console<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.input.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.input.consume(amt);
    }
}

impl Write for Console<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}
