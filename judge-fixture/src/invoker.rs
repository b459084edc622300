//! Construct the program under test and invoke its entry point

use std::any::Any;
use std::fmt::Debug;
use std::panic::{catch_unwind, AssertUnwindSafe};

use anyhow::Result;
use log::debug;

use crate::console::{Console, Program};
use crate::error::Error;

/// The names of the entry points which are tried if no other names are configured
///
/// Most judges use `run` or `main`. The order is the priority.
pub const DEFAULT_METHODS: [&str; 2] = ["run", "main"];

/// Anything a [`crate::Fixture`] can run
pub trait Invoke {
    /// The name of the program used in log and error messages
    fn name(&self) -> &str;

    /// Run the program with the given `console` as its standard input and output
    fn invoke(&self, console: &mut Console<'_>) -> Result<()>;
}

/// A named entry point of a type which is not a [`Program`]
///
/// An entry point is an explicitly registered adapter. It passes default values for any arguments
/// of the wrapped method, for example an empty argument list to a `main(args)`.
pub enum EntryPoint<T> {
    /// An entry point reading from and writing to the [`Console`]
    Console(fn(&mut T, &mut Console<'_>) -> Result<()>),
    /// An entry point using [`std::io::stdin`] and [`std::io::stdout`] directly
    ///
    /// This entry point needs a fixture with [`crate::Redirect::Process`].
    Stdio(fn(&mut T) -> Result<()>),
}

/// The type under test together with the description how to construct and run it
pub struct Target<T> {
    constructor: fn() -> Result<T>,
    entry_points: Vec<(String, EntryPoint<T>)>,
    methods: Vec<String>,
    name: &'static str,
    runnable: Option<fn(&mut T, &mut Console<'_>) -> Result<()>>,
}

impl<T> Target<T> {
    /// Create a `Target` which is constructed with `constructor`
    ///
    /// The target has no entry points yet. Register them with [`Target::entry_point`]. To run a
    /// [`Program`] with its [`Program::run`] add [`Target::runnable`].
    pub fn with_constructor(constructor: fn() -> Result<T>) -> Self {
        Self {
            constructor,
            entry_points: vec![],
            methods: DEFAULT_METHODS.iter().map(|&m| m.to_owned()).collect(),
            name: std::any::type_name::<T>(),
            runnable: None,
        }
    }

    /// Register a named entry point
    ///
    /// Unless the target is [`Target::runnable`], the first entry point which name is in the list
    /// of [`Target::methods`] is invoked. Entry points with the same name are tried in registration
    /// order.
    pub fn entry_point<N>(mut self, name: N, entry_point: EntryPoint<T>) -> Self
    where
        N: Into<String>,
    {
        self.entry_points.push((name.into(), entry_point));
        self
    }

    /// Override the names of the entry points to look for (default: [`DEFAULT_METHODS`])
    pub fn methods<I, N>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    /// The names of the entry points to look for in the order of their priority
    pub fn candidate_methods(&self) -> &[String] {
        &self.methods
    }

    fn construct(&self) -> Result<T> {
        match catch_unwind(AssertUnwindSafe(self.constructor)) {
            Ok(Ok(instance)) => Ok(instance),
            Ok(Err(error)) => {
                Err(Error::ConstructionFailed(self.name.to_owned(), format!("{error:#}")).into())
            }
            Err(payload) => Err(Error::ConstructionFailed(
                self.name.to_owned(),
                format!("Panicked: {}", panic_message(payload.as_ref())),
            )
            .into()),
        }
    }

    fn find_entry_point(&self) -> Option<(&str, &EntryPoint<T>)> {
        self.methods.iter().find_map(|method| {
            self.entry_points
                .iter()
                .find(|(name, _)| name == method)
                .map(|(name, entry_point)| (name.as_str(), entry_point))
        })
    }
}

impl<T> Target<T>
where
    T: Default,
{
    /// Create a `Target` constructed with [`Default::default`] which runs a named entry point
    ///
    /// Only the registered entry points are considered, even if `T` implements [`Program`]. Use
    /// [`Target::program`] for a [`Program`].
    pub fn named() -> Self {
        Self::with_constructor(|| Ok(T::default()))
    }
}

impl<T> Target<T>
where
    T: Program + Default,
{
    /// Create a `Target` for a [`Program`] constructed with [`Default::default`]
    pub fn program() -> Self {
        Self::named().runnable()
    }
}

impl<T> Target<T>
where
    T: Program,
{
    /// Run this target with [`Program::run`]
    ///
    /// A runnable target ignores all registered entry points.
    pub fn runnable(mut self) -> Self {
        self.runnable = Some(|instance, console| instance.run(console));
        self
    }
}

impl<T> Debug for Target<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("runnable", &self.runnable.is_some())
            .field(
                "entry_points",
                &self
                    .entry_points
                    .iter()
                    .map(|(name, _)| name)
                    .collect::<Vec<_>>(),
            )
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

impl<I> Invoke for &I
where
    I: Invoke + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn invoke(&self, console: &mut Console<'_>) -> Result<()> {
        (**self).invoke(console)
    }
}

impl<T> Invoke for Target<T> {
    fn name(&self) -> &str {
        self.name
    }

    fn invoke(&self, console: &mut Console<'_>) -> Result<()> {
        let mut instance = self.construct()?;

        if let Some(run) = self.runnable {
            debug!("Running '{}' as program", self.name);
            return run(&mut instance, console);
        }

        match self.find_entry_point() {
            Some((name, EntryPoint::Console(func))) => {
                debug!("Running entry point '{name}' of '{}'", self.name);
                func(&mut instance, console)
            }
            Some((name, EntryPoint::Stdio(func))) => {
                if !console.is_process_wide() {
                    return Err(Error::ConfigurationError(format!(
                        "The entry point '{name}' of '{}' uses stdin and stdout directly but the \
                         fixture doesn't redirect them process wide",
                        self.name
                    ))
                    .into());
                }
                debug!("Running entry point '{name}' of '{}' with stdio", self.name);
                func(&mut instance)
            }
            None => Err(Error::NoEntryPoint(self.name.to_owned(), self.methods.clone()).into()),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("Box<dyn Any>")
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, Write};

    use anyhow::anyhow;
    use rstest::rstest;

    use super::*;

    #[derive(Default)]
    struct Both;

    impl Program for Both {
        fn run(&mut self, console: &mut Console<'_>) -> Result<()> {
            write!(console, "program")?;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Legacy {
        args: Option<Vec<String>>,
    }

    impl Legacy {
        fn main(&mut self, console: &mut Console<'_>, args: &[String]) -> Result<()> {
            self.args = Some(args.to_vec());
            write!(console, "main({})", args.len())?;
            Ok(())
        }

        fn run(&mut self, console: &mut Console<'_>) -> Result<()> {
            write!(console, "run")?;
            Ok(())
        }

        fn solve(&mut self, console: &mut Console<'_>) -> Result<()> {
            let mut line = String::new();
            console.read_line(&mut line)?;
            write!(console, "solve {}", line.trim())?;
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Failing;

    fn invoke<T>(target: &Target<T>, input: &str) -> Result<String> {
        let mut input = input.as_bytes();
        let mut output = vec![];
        target.invoke(&mut Console::new(&mut input, &mut output))?;
        Ok(String::from_utf8(output).unwrap())
    }

    fn legacy() -> Target<Legacy> {
        Target::<Legacy>::named()
            .entry_point("main", EntryPoint::Console(|s, c| s.main(c, &[])))
            .entry_point("run", EntryPoint::Console(Legacy::run))
            .entry_point("solve", EntryPoint::Console(Legacy::solve))
    }

    #[test]
    fn test_program_has_priority_over_entry_points() {
        let target = Target::<Both>::program()
            .entry_point("run", EntryPoint::Console(|_, c| Ok(write!(c, "entry")?)));

        assert_eq!(invoke(&target, "").unwrap(), "program");
    }

    #[rstest]
    #[case::program(Target::<Both>::program())]
    #[case::runnable(Target::<Both>::named().runnable())]
    #[case::custom_methods(Target::<Both>::program().methods(["solve"]))]
    fn test_program_runs_without_entry_points(#[case] target: Target<Both>) {
        assert_eq!(invoke(&target, "").unwrap(), "program");
    }

    #[test]
    fn test_named_target_of_program_uses_entry_points() {
        let target = Target::<Both>::named()
            .entry_point("run", EntryPoint::Console(|_, c| Ok(write!(c, "entry")?)));

        assert_eq!(invoke(&target, "").unwrap(), "entry");
    }

    #[test]
    fn test_no_entry_point_message() {
        let error = invoke(&Target::<Both>::named(), "").unwrap_err();

        assert_eq!(
            error.to_string(),
            format!(
                "No entry point found for '{}': The target isn't run as `Program` and none of \
                 the entry points [run, main] is registered",
                std::any::type_name::<Both>()
            )
        );
    }

    #[rstest]
    #[case::default_methods_prefer_run(None, "run")]
    #[case::main_first(Some(vec!["main", "run"]), "main(0)")]
    #[case::custom_name(Some(vec!["solve"]), "solve 42")]
    #[case::skips_unregistered(Some(vec!["unknown", "main"]), "main(0)")]
    fn test_entry_point_order(#[case] methods: Option<Vec<&str>>, #[case] expected: &str) {
        let target = match methods {
            Some(methods) => legacy().methods(methods),
            None => legacy(),
        };

        assert_eq!(invoke(&target, "42\n").unwrap(), expected);
    }

    #[test]
    fn test_same_name_uses_first_registered() {
        let target = Target::<Legacy>::named()
            .entry_point("main", EntryPoint::Console(|_, c| Ok(write!(c, "first")?)))
            .entry_point("main", EntryPoint::Console(|_, c| Ok(write!(c, "second")?)));

        assert_eq!(invoke(&target, "").unwrap(), "first");
    }

    #[test]
    fn test_when_no_entry_point_then_error() {
        let target = legacy().methods(["solve_fast"]);

        let error = invoke(&target, "").unwrap_err();

        assert_eq!(
            error.downcast_ref::<Error>(),
            Some(&Error::NoEntryPoint(
                std::any::type_name::<Legacy>().to_owned(),
                vec!["solve_fast".to_owned()]
            ))
        );
    }

    #[test]
    fn test_stdio_entry_point_needs_process_wide_console() {
        let target =
            Target::<Legacy>::named().entry_point("main", EntryPoint::Stdio(|_| Ok(())));

        let error = invoke(&target, "").unwrap_err();

        assert!(matches!(
            error.downcast_ref::<Error>(),
            Some(Error::ConfigurationError(_))
        ));
    }

    #[rstest]
    #[case::error(|| Err(anyhow!("no resources")), "no resources")]
    #[case::panic(|| panic!("boom"), "Panicked: boom")]
    fn test_when_construction_fails(
        #[case] constructor: fn() -> Result<Failing>,
        #[case] message: &str,
    ) {
        let target = Target::with_constructor(constructor)
            .entry_point("run", EntryPoint::Console(|_, _| Ok(())));

        let error = invoke(&target, "").unwrap_err();

        assert_eq!(
            error.downcast_ref::<Error>(),
            Some(&Error::ConstructionFailed(
                std::any::type_name::<Failing>().to_owned(),
                message.to_owned()
            ))
        );
    }

    #[test]
    fn test_program_error_keeps_its_identity() {
        #[derive(Debug, PartialEq)]
        struct WrongInput(u32);

        impl std::fmt::Display for WrongInput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "wrong input {}", self.0)
            }
        }

        impl std::error::Error for WrongInput {}

        let target = Target::<Legacy>::named()
            .entry_point("run", EntryPoint::Console(|_, _| Err(WrongInput(7).into())));

        let error = invoke(&target, "").unwrap_err();

        assert_eq!(error.downcast_ref::<WrongInput>(), Some(&WrongInput(7)));
    }

    #[test]
    fn test_entry_point_receives_default_arguments() {
        let target = Target::<Legacy>::named().methods(["main"]).entry_point(
            "main",
            EntryPoint::Console(|s, c| {
                s.main(c, &[])?;
                assert_eq!(s.args.as_deref(), Some(&[][..]));
                Ok(())
            }),
        );

        assert_eq!(invoke(&target, "").unwrap(), "main(0)");
    }
}
