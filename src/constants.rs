//! Common constants used throughout the template machine.

/// Base configuration file looked up in the project root when none is given
pub const BASE_CONFIG_FILE: &str = "template-machine.properties";

/// Per-directory override configuration file
pub const LOCAL_CONFIG_FILE: &str = ".config";

/// Extension of localization files inside the localization folder
pub const LOCALIZATION_EXTENSION: &str = "properties";

/// Reserved language key seeding fallback values into every other language
pub const DEFAULT_LANGUAGE: &str = "default";

/// Configuration keys understood by the core.
pub mod keys {
    pub const LANGUAGES: &str = "languages";
    pub const LOCALIZATION_DIR: &str = "localizationDir";
    pub const TEMPLATE_DIR: &str = "templateDir";
}

/// Hard defaults, consulted after every configuration layer.
pub const DEFAULT_CONFIG: [(&str, &str); 3] = [
    (keys::LANGUAGES, "auto"),
    (keys::LOCALIZATION_DIR, "__localization"),
    (keys::TEMPLATE_DIR, "__templates"),
];

/// Keys injected into every merged localization table.
pub mod run_keys {
    pub const LANGUAGE_KEY: &str = "languageKey";
    pub const RUN_DATE: &str = "runDate";
    pub const RUN_TIME: &str = "runTime";
    pub const TEMPLATE_PATH: &str = "templatePath";
    pub const TEMPLATE_RELATIVE_PATH: &str = "templateRelativePath";
}

pub const RUN_DATE_FORMAT: &str = "%d/%m/%Y";
pub const RUN_TIME_FORMAT: &str = "%H:%M:%S";

/// Editor and OS artifacts that never count as input
pub const ARTIFACT_PATTERNS: [&str; 4] = [".*", "*~", "*.bak", "*.swp"];
