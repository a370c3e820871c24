//! Command-line options and the validated run configuration derived from them.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::fetch::{ApiKey, BasicClient, HttpClient};
use crate::source::{FileSource, RecordSource, WindowedApiSource};
use crate::stats::TOP_N;

/// Longest window accepted by `--days`; one request is issued per day.
pub const MAX_DAYS: u32 = 366;

/// Where index rows are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// A local JSON file
    File,
    /// The cluster's `_cat/indices` API, one request per day
    Api,
}

/// Report rendering on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "index_stats")]
#[command(about = "Rank cluster indexes by size, shard count and shard balance", long_about = None)]
pub struct Cli {
    /// Where to read index metadata from
    #[arg(long, value_enum, default_value_t = Mode::Api)]
    pub mode: Mode,

    /// Read from the local JSON file instead of the API (same as `--mode file`)
    #[arg(long)]
    pub debug: bool,

    /// JSON file of `_cat/indices` rows, used in file mode
    #[arg(long, default_value = "testcases/example-in.json")]
    pub path: PathBuf,

    /// Cluster host, optionally with an http:// or https:// scheme
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Number of days of indices to fetch, including today (at most 366)
    #[arg(long, default_value_t = 7)]
    pub days: u32,

    /// IANA time zone that decides what "today" is
    #[arg(long, default_value = "America/Toronto")]
    pub timezone: String,

    /// Number of entries in each ranking
    #[arg(long, default_value_t = TOP_N)]
    pub top: usize,

    /// Elasticsearch API key sent as `Authorization: ApiKey <key>`
    #[arg(long, env = "INDEX_STATS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Report format written to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// CSV file to append ranked rows to
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    File {
        path: PathBuf,
    },
    Api {
        endpoint: String,
        days: u32,
        today: NaiveDate,
        api_key: Option<String>,
    },
}

/// Everything one run needs, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: SourceConfig,
    pub top_n: usize,
    pub format: OutputFormat,
    pub csv: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        Self::resolve(cli, Utc::now())
    }

    /// Validates `cli`, taking "today" from `now` in the configured time zone.
    pub fn resolve(cli: Cli, now: DateTime<Utc>) -> Result<Self, ConfigError> {
        if cli.top == 0 {
            return Err(ConfigError::ZeroTop);
        }

        let mode = if cli.debug { Mode::File } else { cli.mode };
        let source = match mode {
            Mode::File => SourceConfig::File { path: cli.path },
            Mode::Api => {
                let endpoint = cli
                    .endpoint
                    .filter(|e| !e.trim().is_empty())
                    .ok_or(ConfigError::MissingEndpoint)?;
                if cli.days == 0 {
                    return Err(ConfigError::ZeroDays);
                }
                if cli.days > MAX_DAYS {
                    return Err(ConfigError::TooManyDays(MAX_DAYS));
                }
                let tz: Tz = cli
                    .timezone
                    .parse()
                    .map_err(|_| ConfigError::UnknownTimezone(cli.timezone.clone()))?;

                SourceConfig::Api {
                    endpoint,
                    days: cli.days,
                    today: today_in(tz, now),
                    api_key: cli.api_key,
                }
            }
        };

        Ok(Config {
            source,
            top_n: cli.top,
            format: cli.format,
            csv: cli.csv,
        })
    }

    /// Instantiates the configured [`RecordSource`].
    pub fn build_source(&self) -> Result<Box<dyn RecordSource>, ConfigError> {
        let source: Box<dyn RecordSource> = match &self.source {
            SourceConfig::File { path } => Box::new(FileSource::new(path)),
            SourceConfig::Api {
                endpoint,
                days,
                today,
                api_key,
            } => {
                let client: Box<dyn HttpClient> = match api_key {
                    Some(key) => Box::new(
                        ApiKey::new(BasicClient::new(), key)
                            .map_err(|_| ConfigError::InvalidApiKey)?,
                    ),
                    None => Box::new(BasicClient::new()),
                };
                Box::new(WindowedApiSource::new(client, endpoint.clone(), *days, *today))
            }
        };
        Ok(source)
    }
}

/// The calendar date of `now` in `tz`.
pub fn today_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("index_stats").chain(args.iter().copied())).unwrap()
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_debug_flag_selects_file_mode() {
        let config = Config::resolve(parse(&["--debug", "--path", "rows.json"]), noon()).unwrap();
        assert_eq!(
            config.source,
            SourceConfig::File {
                path: PathBuf::from("rows.json")
            }
        );
    }

    #[test]
    fn test_file_mode_ignores_api_options() {
        let config = Config::resolve(parse(&["--mode", "file", "--days", "0"]), noon()).unwrap();
        assert!(matches!(config.source, SourceConfig::File { .. }));
    }

    #[test]
    fn test_api_mode() {
        let config = Config::resolve(
            parse(&["--endpoint", "logs.example.com", "--days", "3", "--top", "10"]),
            noon(),
        )
        .unwrap();

        assert_eq!(config.top_n, 10);
        match config.source {
            SourceConfig::Api {
                endpoint,
                days,
                today,
                ..
            } => {
                assert_eq!(endpoint, "logs.example.com");
                assert_eq!(days, 3);
                assert_eq!(today, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }

    #[test]
    fn test_api_mode_requires_endpoint() {
        let err = Config::resolve(parse(&[]), noon()).unwrap_err();
        assert_eq!(err, ConfigError::MissingEndpoint);

        let err = Config::resolve(parse(&["--endpoint", " "]), noon()).unwrap_err();
        assert_eq!(err, ConfigError::MissingEndpoint);
    }

    #[test]
    fn test_zero_days_rejected() {
        let err = Config::resolve(parse(&["--endpoint", "h", "--days", "0"]), noon()).unwrap_err();
        assert_eq!(err, ConfigError::ZeroDays);
    }

    #[test]
    fn test_days_capped() {
        let err = Config::resolve(parse(&["--endpoint", "h", "--days", "4000000000"]), noon())
            .unwrap_err();
        assert_eq!(err, ConfigError::TooManyDays(MAX_DAYS));

        let config = Config::resolve(parse(&["--endpoint", "h", "--days", "366"]), noon()).unwrap();
        assert!(matches!(config.source, SourceConfig::Api { days: 366, .. }));
    }

    #[tokio::test]
    async fn test_api_key_reaches_the_cluster() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Regex(r"^/_cat/indices/".into()))
            .match_header("authorization", "ApiKey c2VjcmV0")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .expect(2)
            .create_async()
            .await;

        let url = server.url();
        let args = ["--endpoint", url.as_str(), "--days", "2", "--api-key", "c2VjcmV0"];
        let config = Config::resolve(parse(&args), noon()).unwrap();
        let rows = config.build_source().unwrap().fetch().await.unwrap();

        assert!(rows.is_empty());
        mock.assert_async().await;
    }

    #[test]
    fn test_zero_top_rejected() {
        let err = Config::resolve(parse(&["--debug", "--top", "0"]), noon()).unwrap_err();
        assert_eq!(err, ConfigError::ZeroTop);
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let err = Config::resolve(parse(&["--endpoint", "h", "--timezone", "Mars/Olympus"]), noon())
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownTimezone("Mars/Olympus".to_string()));
    }

    #[test]
    fn test_today_follows_timezone() {
        // 02:00 UTC is still the previous evening in Toronto
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 2, 0, 0).unwrap();
        assert_eq!(
            today_in(chrono_tz::America::Toronto, now),
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
        );
        assert_eq!(
            today_in(chrono_tz::UTC, now),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
        );
    }

    #[test]
    fn test_build_source_describes_origin() {
        let config = Config::resolve(parse(&["--debug", "--path", "rows.json"]), noon()).unwrap();
        let source = config.build_source().unwrap();
        assert_eq!(source.describe(), "file rows.json");
    }
}
