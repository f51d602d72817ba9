use crate::{
    codec::{encode, icon::IconRepresentation},
    core::{config::ZoomPanOptions, constants::LOGO_INVISIBLE_CLASS, geo::Coordinate},
    layers::marker::AnnotationId,
    script::MapHandle,
};

/// A fire-and-forget operation on the embedded map
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PanTo {
        coordinate: Coordinate,
        options: Option<ZoomPanOptions>,
    },
    SetZoom {
        level: i32,
        options: Option<ZoomPanOptions>,
    },
    SetMinZoom(i32),
    SetMaxZoom(i32),
    /// Must not be empty
    FitBounds(Vec<Coordinate>),
    AddMarker {
        id: AnnotationId,
        coordinate: Coordinate,
        icon: IconRepresentation,
    },
    RemoveMarker(AnnotationId),
    SetLogoVisible(bool),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::PanTo { .. } => "panTo",
            Command::SetZoom { .. } => "setZoom",
            Command::SetMinZoom(_) => "setMinZoom",
            Command::SetMaxZoom(_) => "setMaxZoom",
            Command::FitBounds(_) => "fitBounds",
            Command::AddMarker { .. } => "addMarker",
            Command::RemoveMarker(_) => "removeMarker",
            Command::SetLogoVisible(_) => "setLogoVisible",
        }
    }

    /// Builds the script for this command, `None` if an argument cannot be
    /// encoded
    pub fn to_script(&self, handle: &MapHandle) -> Option<String> {
        let body = match self {
            Command::PanTo {
                coordinate,
                options,
            } => format!(
                "    bridge.map.panTo({}, {});",
                encode(&coordinate.to_pair())?,
                encode_options(options.as_ref())?
            ),
            Command::SetZoom { level, options } => format!(
                "    bridge.map.setZoom({}, {});",
                level,
                encode_options(options.as_ref())?
            ),
            Command::SetMinZoom(level) => format!("    bridge.map.setMinZoom({});", level),
            Command::SetMaxZoom(level) => format!("    bridge.map.setMaxZoom({});", level),
            Command::FitBounds(coordinates) => {
                if coordinates.is_empty() {
                    return None;
                }
                let pairs: Vec<[f64; 2]> = coordinates.iter().map(Coordinate::to_pair).collect();
                format!("    bridge.map.fitBounds({});", encode(&pairs)?)
            }
            Command::AddMarker {
                id,
                coordinate,
                icon,
            } => format!(
                r#"    var marker = L.marker({position}, {{ icon: L.icon({icon}) }});
    marker.uuid = {id};
    marker.on('click', function () {{
        bridge.send('markerclick', {{ bounds: bridge.map.getBounds(), uuid: this.uuid }});
    }});
    marker.addTo(bridge.map);
    bridge.markers[marker.uuid] = marker;"#,
                position = encode(&coordinate.to_pair())?,
                icon = encode(icon)?,
                id = encode(&id.to_string())?,
            ),
            Command::RemoveMarker(id) => format!(
                r#"    var id = {id};
    var marker = bridge.markers[id];
    if (marker) {{
        bridge.map.removeLayer(marker);
        delete bridge.markers[id];
    }}"#,
                id = encode(&id.to_string())?,
            ),
            // Works on the document itself, so it must not wait for the handle
            Command::SetLogoVisible(visible) => {
                return Some(format!(
                    "var body = document.querySelector(\"body\");\nif (body) {{ body.classList.{}(\"{}\"); }}\n0;",
                    if *visible { "remove" } else { "add" },
                    LOGO_INVISIBLE_CLASS
                ));
            }
        };
        Some(handle.scope(&format!("{}\n    return 0;", body)))
    }
}

fn encode_options(options: Option<&ZoomPanOptions>) -> Option<String> {
    match options {
        Some(options) => encode(options),
        None => Some("{}".to_string()),
    }
}

/// An operation whose script result is handed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Center,
    Zoom,
    /// Container-space point of a registered marker
    ContainerPoint(AnnotationId),
}

impl Query {
    pub fn name(&self) -> &'static str {
        match self {
            Query::Center => "getCenter",
            Query::Zoom => "getZoom",
            Query::ContainerPoint(_) => "latLngToContainerPoint",
        }
    }

    pub fn to_script(&self, handle: &MapHandle) -> Option<String> {
        let body = match self {
            Query::Center => "    return bridge.map.getCenter();".to_string(),
            Query::Zoom => "    return bridge.map.getZoom();".to_string(),
            Query::ContainerPoint(id) => format!(
                r#"    var marker = bridge.markers[{}];
    if (!marker) {{ return null; }}
    return bridge.map.latLngToContainerPoint(marker.getLatLng());"#,
                encode(&id.to_string())?
            ),
        };
        Some(handle.scope(&body))
    }
}
