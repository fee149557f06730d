//! Process exit codes (BSD sysexits.h values).

use crate::error::{AggregationError, ConfigError};

/// Input data was not in the expected encoding
pub const DATAERR: i32 = 65;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Can't create output file
pub const CANTCREAT: i32 = 73;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;

/// Pick the exit code for an error chain by looking at its typed root.
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(e) = err.downcast_ref::<AggregationError>() {
        return match e {
            AggregationError::CreateOutput { .. } => CANTCREAT,
            AggregationError::Write { .. } | AggregationError::Read { .. } => IOERR,
            AggregationError::Decode { .. } => DATAERR,
        };
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return CONFIG;
    }
    SOFTWARE
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn decode_failure_maps_to_dataerr() {
        let err = anyhow::Error::new(AggregationError::Decode {
            path: PathBuf::from("a.js"),
        });
        assert_eq!(for_error(&err), DATAERR);
    }

    #[test]
    fn context_does_not_hide_the_root_kind() {
        let res: Result<(), AggregationError> = Err(AggregationError::CreateOutput {
            path: PathBuf::from("out.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        let err = res.context("combine failed").unwrap_err();
        assert_eq!(for_error(&err), CANTCREAT);
    }

    #[test]
    fn config_errors_and_unknowns() {
        let err = anyhow::Error::new(ConfigError::Invalid("x".into()));
        assert_eq!(for_error(&err), CONFIG);
        assert_eq!(for_error(&anyhow::anyhow!("boom")), SOFTWARE);
    }
}
