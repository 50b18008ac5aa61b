//! Process-wide GDAL configuration.
//!
//! GDAL reads configuration options such as `GDAL_CACHEMAX` or `GDAL_NUM_THREADS` from the
//! environment; options applied here override those.
//!
//! ```
//! # fn main() -> rastwarp::errors::Result<()> {
//! use rastwarp::config::apply_gdal_config;
//!
//! let applied = apply_gdal_config(["GDAL_CACHEMAX=512"])?;
//! assert_eq!(applied, vec![("GDAL_CACHEMAX".to_string(), "512".to_string())]);
//! assert_eq!(gdal::config::get_config_option("GDAL_CACHEMAX", "")?, "512");
//! # gdal::config::clear_config_option("GDAL_CACHEMAX")?;
//! # Ok(())
//! # }
//! ```
//!
//! Refer to [GDAL `ConfigOptions`](https://gdal.org/user/configoptions.html) for a full list of
//! options.

use gdal::errors::CplErrType;

use crate::errors::Result;
use crate::options::parse_key_value;

/// Apply `KEY=VALUE` pairs as GDAL configuration options, returning what was set.
///
/// All pairs are parsed before any is applied, so a malformed pair leaves the configuration
/// untouched.
pub fn apply_gdal_config<I, S>(pairs: I) -> Result<Vec<(String, String)>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parsed = pairs
        .into_iter()
        .map(|pair| parse_key_value(pair.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    for (key, value) in &parsed {
        gdal::config::set_config_option(key, value)?;
        tracing::debug!(key = %key, value = %value, "set GDAL config option");
    }
    Ok(parsed)
}

/// Route GDAL's error and debug messages into `tracing`.
pub fn install_gdal_log_handler() {
    gdal::config::set_error_handler(log_cpl_message);
}

/// Forward one CPL message at the matching `tracing` level.
pub fn log_cpl_message(class: CplErrType, number: i32, msg: &str) {
    match class {
        CplErrType::None => tracing::trace!(target: "gdal", number, "{msg}"),
        CplErrType::Debug => tracing::debug!(target: "gdal", number, "{msg}"),
        CplErrType::Warning => tracing::warn!(target: "gdal", number, "{msg}"),
        CplErrType::Failure | CplErrType::Fatal => {
            tracing::error!(target: "gdal", number, class = ?class, "{msg}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WarpError;

    #[test]
    fn apply_and_clear() -> Result<()> {
        let applied = apply_gdal_config(["RASTWARP_TEST_OPTION=on", "RASTWARP_TEST_OTHER = 3 "])?;
        assert_eq!(applied.len(), 2);
        assert_eq!(
            gdal::config::get_config_option("RASTWARP_TEST_OPTION", "")?,
            "on"
        );
        assert_eq!(gdal::config::get_config_option("RASTWARP_TEST_OTHER", "")?, "3");

        gdal::config::clear_config_option("RASTWARP_TEST_OPTION")?;
        gdal::config::clear_config_option("RASTWARP_TEST_OTHER")?;
        Ok(())
    }

    #[test]
    fn malformed_pair_applies_nothing() -> Result<()> {
        let res = apply_gdal_config(["RASTWARP_TEST_UNSET=1", "no-equals-sign"]);
        assert!(matches!(res, Err(WarpError::BadArgument(_))));
        assert_eq!(
            gdal::config::get_config_option("RASTWARP_TEST_UNSET", "XXX")?,
            "XXX"
        );
        Ok(())
    }
}
