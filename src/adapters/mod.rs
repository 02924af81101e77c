// Adapters layer: concrete implementations for external systems.
// Filesystem storage stays under src/config/cli.rs next to the CLI settings.

pub mod http;
