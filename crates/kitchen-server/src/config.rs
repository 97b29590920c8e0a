//! Server settings from `kitchen.toml`, the environment, and the command line

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;

/// Name of the settings file looked up from the current directory upwards
pub const SETTINGS_FILE: &str = "kitchen.toml";

/// Settings of the HTTP server
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ServerSettings {
    /// Host to listen on
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Number of threads serving HTTP requests
    pub worker_threads: u32,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 5000,
            worker_threads: 4,
        }
    }
}

/// Contents of a settings file; every key is optional
#[derive(Clone, Default, Deserialize, Debug)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct FileSettings {
    host: Option<String>,
    port: Option<u16>,
    worker_threads: Option<u32>,
}

impl ServerSettings {
    /// Resolve the settings of this process
    ///
    /// Defaults are overridden by the settings file, then by `KITCHEN_*`
    /// environment variables, then by command line flags.
    pub fn load() -> Result<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::resolve(&args, |key| std::env::var_os(key))
    }

    /// Resolve settings from the given arguments and environment lookup
    pub fn resolve<F>(args: &[String], env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let flags = Flags::parse(args)?;

        let file = match &flags.config {
            Some(path) => Some(read_file(path)?),
            None => find_file()?,
        };

        let mut settings = Self::default();
        if let Some(file) = file {
            settings.apply_file(file);
        }
        settings.apply_env(env)?;
        settings.apply_flags(&flags)?;

        if settings.worker_threads == 0 {
            return Err(eyre!("worker-threads must be at least 1"));
        }
        Ok(settings)
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(threads) = file.worker_threads {
            self.worker_threads = threads;
        }
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(host) = env("KITCHEN_HOST") {
            self.host = host
                .into_string()
                .map_err(|_| eyre!("KITCHEN_HOST contains invalid UTF-8"))?;
        }
        if let Some(port) = env("KITCHEN_PORT") {
            self.port = parse_os("KITCHEN_PORT", port)?;
        }
        if let Some(threads) = env("KITCHEN_WORKER_THREADS") {
            self.worker_threads = parse_os("KITCHEN_WORKER_THREADS", threads)?;
        }
        Ok(())
    }

    fn apply_flags(&mut self, flags: &Flags) -> Result<()> {
        if let Some(host) = &flags.host {
            self.host.clone_from(host);
        }
        if let Some(port) = &flags.port {
            self.port = port.parse().wrap_err("-port takes a decimal u16")?;
        }
        if let Some(threads) = &flags.worker_threads {
            self.worker_threads = threads
                .parse()
                .wrap_err("-worker-threads takes a decimal u32")?;
        }
        Ok(())
    }
}

/// Raw command line flags
#[derive(Default, Debug)]
struct Flags {
    config: Option<PathBuf>,
    host: Option<String>,
    port: Option<String>,
    worker_threads: Option<String>,
}

impl Flags {
    fn parse(args: &[String]) -> Result<Self> {
        let mut flags = Flags::default();

        let mut option: Option<&str> = None;
        for arg in args {
            if let Some(opt) = option.take() {
                match opt {
                    "-config" => flags.config = Some(PathBuf::from(arg)),
                    "-host" => flags.host = Some(arg.clone()),
                    "-port" => flags.port = Some(arg.clone()),
                    "-worker-threads" => flags.worker_threads = Some(arg.clone()),
                    _ => return Err(eyre!("unknown option {opt}")),
                }
            } else {
                option = Some(arg.as_str());
            }
        }
        if let Some(opt) = option {
            return Err(eyre!("leftover option {opt}"));
        }

        Ok(flags)
    }
}

fn parse_os<T>(key: &str, value: OsString) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(value) = value.to_str() else {
        return Err(eyre!("{key} contains invalid UTF-8"));
    };
    value
        .parse()
        .wrap_err_with(|| format!("{key} has an invalid value {value:?}"))
}

fn read_file(path: &Path) -> Result<FileSettings> {
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("could not read {}", path.display()))?;
    toml::from_str(&contents).wrap_err_with(|| format!("invalid settings in {}", path.display()))
}

/// Look for a settings file in the current directory and its ancestors
fn find_file() -> Result<Option<FileSettings>> {
    let mut path = std::env::current_dir()?;
    loop {
        path.push(SETTINGS_FILE);

        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let settings = toml::from_str(&contents)
                    .wrap_err_with(|| format!("invalid settings in {}", path.display()))?;
                return Ok(Some(settings));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        path.pop();
        if !path.pop() {
            return Ok(None);
        }
    }
}
