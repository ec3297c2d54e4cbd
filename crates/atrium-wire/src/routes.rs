//! Closed dispatch tables.
//!
//! Each service declares a static table of [`RouteSpec`] entries:
//! method name plus accepted argument count. [`resolve`] checks an
//! incoming request against the table before anything executes;
//! unknown methods and arity mismatches never reach an operation.

/// One declared operation: name and accepted argument count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSpec {
    /// Method name as it appears on the wire.
    pub name: &'static str,
    /// Minimum accepted argument count.
    pub min_args: usize,
    /// Maximum accepted argument count.
    pub max_args: usize,
}

impl RouteSpec {
    /// An operation with a fixed argument count.
    pub const fn exact(name: &'static str, args: usize) -> Self {
        Self {
            name,
            min_args: args,
            max_args: args,
        }
    }

    /// An operation with trailing optional arguments.
    pub const fn ranged(name: &'static str, min_args: usize, max_args: usize) -> Self {
        Self {
            name,
            min_args,
            max_args,
        }
    }

    fn accepts(&self, argc: usize) -> bool {
        (self.min_args..=self.max_args).contains(&argc)
    }

    fn arity_label(&self) -> String {
        if self.min_args == self.max_args {
            self.min_args.to_string()
        } else {
            format!("{} to {}", self.min_args, self.max_args)
        }
    }
}

/// Why a request failed to route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The method is not in the table.
    #[error("unknown method '{0}'")]
    UnknownMethod(String),

    /// The method exists but was called with the wrong argument count.
    #[error("method '{name}' takes {expected} argument(s), got {got}")]
    WrongArity {
        name: String,
        expected: String,
        got: usize,
    },
}

/// Look up a method and validate its argument count against a table.
pub fn resolve<'t>(
    table: &'t [RouteSpec],
    method: &str,
    argc: usize,
) -> Result<&'t RouteSpec, RouteError> {
    let spec = table
        .iter()
        .find(|spec| spec.name == method)
        .ok_or_else(|| RouteError::UnknownMethod(method.to_string()))?;

    if !spec.accepts(argc) {
        return Err(RouteError::WrongArity {
            name: spec.name.to_string(),
            expected: spec.arity_label(),
            got: argc,
        });
    }

    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[RouteSpec] = &[
        RouteSpec::exact("add", 1),
        RouteSpec::exact("reserve", 4),
        RouteSpec::ranged("checkavailability", 1, 2),
    ];

    #[test]
    fn resolves_declared_methods() {
        assert_eq!(resolve(TABLE, "add", 1).unwrap().name, "add");
        assert_eq!(resolve(TABLE, "reserve", 4).unwrap().name, "reserve");
    }

    #[test]
    fn optional_trailing_argument_is_accepted() {
        assert!(resolve(TABLE, "checkavailability", 1).is_ok());
        assert!(resolve(TABLE, "checkavailability", 2).is_ok());
        assert!(resolve(TABLE, "checkavailability", 3).is_err());
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = resolve(TABLE, "drop_table", 0).unwrap_err();
        assert_eq!(err, RouteError::UnknownMethod("drop_table".to_string()));
    }

    #[test]
    fn wrong_arity_is_rejected_with_expected_count() {
        let err = resolve(TABLE, "reserve", 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "method 'reserve' takes 4 argument(s), got 2"
        );
    }
}
