//! Bridge-wide constants shared by the generated document and the script
//! fragments. Keeping them in a single place keeps both sides of the wire in
//! agreement.

/// Default name of the inbound message channel the document posts to.
pub const DEFAULT_CHANNEL_NAME: &str = "windyMapView";

/// Leaflet build the Windy API is compatible with.
pub const LEAFLET_SCRIPT_URL: &str = "https://unpkg.com/leaflet@1.4.0/dist/leaflet.js";

/// Windy widget bootstrap script (defines `windyInit`).
pub const WINDY_BOOT_SCRIPT_URL: &str = "https://api4.windy.com/assets/libBoot.js";

/// Global object in the web context holding one entry per live bridge handle.
pub const HANDLE_REGISTRY: &str = "windyBridges";

/// Body class that hides the Windy logo.
pub const LOGO_INVISIBLE_CLASS: &str = "windy-logo-invisible";

/// Prefix of the generated document file name (`windy-<handle>.html`).
pub const DOCUMENT_FILE_PREFIX: &str = "windy";

/// Map events forwarded as envelopes once the widget is ready.
pub const FORWARDED_MAP_EVENTS: [&str; 6] =
    ["zoomstart", "zoomend", "movestart", "moveend", "zoom", "move"];
