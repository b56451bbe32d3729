use crate::config;

/// Load settings, falling back to defaults on any problem.
///
/// The problem, if any, is returned so it can be logged once logging is up
/// and shown in the status line.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => {
                let problem = format!("invalid config, using defaults: {msg}");
                eprintln!("tapedeck: {problem}");
                (config::Settings::default(), Some(problem))
            }
        },
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            let problem = format!("failed to load config, using defaults: {e}");
            eprintln!("tapedeck: {problem}");
            (config::Settings::default(), Some(problem))
        }
    }
}
