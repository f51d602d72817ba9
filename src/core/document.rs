//! The HTML document loaded into the web context.
//!
//! It boots the Windy widget with the given options, registers this bridge's
//! handle object once the map exists, forwards viewport events through the
//! native message channel and finally announces `initialize`.

use crate::{
    codec::inline_json,
    core::{
        config::{BridgeConfig, InitOptions},
        constants::{FORWARDED_MAP_EVENTS, HANDLE_REGISTRY, LOGO_INVISIBLE_CLASS},
    },
    script::MapHandle,
    BridgeError, Result,
};
use std::{fs, path::PathBuf};

/// Renders the document for one bridge handle
pub fn render(options: &InitOptions, handle: &MapHandle, config: &BridgeConfig) -> Result<String> {
    let options_json = inline_json(options).ok_or(BridgeError::Encode("init options"))?;
    let channel_json = inline_json(&config.channel_name).ok_or(BridgeError::Encode("channel name"))?;
    let events_json = inline_json(&FORWARDED_MAP_EVENTS).ok_or(BridgeError::Encode("event list"))?;
    let leaflet_url = attribute_value(&config.leaflet_url);
    let boot_url = attribute_value(&config.boot_script_url);

    Ok(format!(
        r#"<html>
    <head>
        <meta name="viewport" content="width=device-width, initial-scale=1.0, shrink-to-fit=no" />
        <script src="{leaflet_url}"></script>
        <script src="{boot_url}"></script>
        <style>
            body {{
                padding: 0;
                margin: 0;
            }}
            html, body, #windy {{
                height: 100%;
                width: 100vw;
            }}
            html body.{logo_class} a#logo {{
                display: none !important;
            }}
            div#mobile-ovr-select, div#embed-zoom, div#bottom, div#windy-app-promo {{
                display: none !important;
            }}
        </style>
    </head>
    <body>
        <div id="windy"></div>
        <script type="text/javascript">
            const options = {options_json};
            const channel = {channel_json};
            const handle = "{handle}";

            function sendNativeMessage(name, options) {{
                var message = {{ name: name, options: options || {{}} }};
                var handlers = window.webkit && window.webkit.messageHandlers;
                if (handlers && handlers[channel]) {{
                    handlers[channel].postMessage(message);
                }} else if (window.ipc) {{
                    window.ipc.postMessage(JSON.stringify(message));
                }}
            }}

            windyInit(options, windyAPI => {{
                const {{ map }} = windyAPI;

                window.{registry} = window.{registry} || {{}};
                window.{registry}[handle] = {{
                    map: map,
                    markers: {{}},
                    send: sendNativeMessage
                }};

                {events_json}.forEach(function(event) {{
                    map.on(event, function() {{
                        sendNativeMessage(event, {{ bounds: map.getBounds() }});
                    }});
                }});

                sendNativeMessage('initialize', {{ bounds: map.getBounds() }});
            }});
        </script>
    </body>
</html>
"#,
        leaflet_url = leaflet_url,
        boot_url = boot_url,
        logo_class = LOGO_INVISIBLE_CLASS,
        options_json = options_json,
        channel_json = channel_json,
        handle = handle,
        registry = HANDLE_REGISTRY,
        events_json = events_json,
    ))
}

/// Escapes text for use inside a double-quoted HTML attribute
fn attribute_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the document and writes it to the handle's document path
pub fn write(options: &InitOptions, handle: &MapHandle, config: &BridgeConfig) -> Result<PathBuf> {
    let markup = render(options, handle, config)?;
    let path = config.document_path(handle.as_str());
    fs::create_dir_all(&config.document_dir)?;
    fs::write(&path, markup)?;
    Ok(path)
}
