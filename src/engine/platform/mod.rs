//! Platform Detection Module
//!
//! Classifies an OS identifier into the filename conventions the server uses.

/// Platform families the updater knows how to lay files out for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    WindowsLike,
    UnixLike,
    Unrecognized,
}

impl PlatformFamily {
    /// Identifier of the platform this binary was built for
    pub fn current_identifier() -> &'static str {
        std::env::consts::OS
    }

    /// Classify an OS identifier such as `linux`, `windows` or `Mac OS X`.
    ///
    /// macOS hosts run the Windows build of the server, so they share the
    /// Windows naming conventions.
    pub fn classify(identifier: &str) -> Self {
        let os = identifier.trim().to_lowercase();

        if os.starts_with("win") || os.starts_with("mac") || os == "darwin" {
            return PlatformFamily::WindowsLike;
        }

        match os.as_str() {
            "linux" | "freebsd" | "netbsd" | "openbsd" | "dragonfly" | "solaris" | "illumos"
            | "sunos" | "aix" => PlatformFamily::UnixLike,
            _ if os.contains("nix") || os.contains("nux") => PlatformFamily::UnixLike,
            _ => PlatformFamily::Unrecognized,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, PlatformFamily::Unrecognized)
    }

    /// File name of the game server executable expected in the server root
    pub fn server_executable(&self) -> Option<&'static str> {
        match self {
            PlatformFamily::WindowsLike => Some("samp-server.exe"),
            PlatformFamily::UnixLike => Some("samp03svr"),
            PlatformFamily::Unrecognized => None,
        }
    }

    /// Required suffix of the native plugin module (matched case-insensitively)
    pub fn plugin_suffix(&self) -> Option<&'static str> {
        match self {
            PlatformFamily::WindowsLike => Some("ill.dll"),
            PlatformFamily::UnixLike => Some("ill"),
            PlatformFamily::Unrecognized => None,
        }
    }

    /// Canonical file name of the native plugin
    pub fn plugin_filename(&self) -> Option<&'static str> {
        match self {
            PlatformFamily::WindowsLike => Some("Shoebill.dll"),
            PlatformFamily::UnixLike => Some("Shoebill"),
            PlatformFamily::Unrecognized => None,
        }
    }
}
