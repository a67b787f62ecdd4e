//! Extracción de metadata EXIF y coordenadas GPS de imágenes.

use super::{ExtractedMetadata, FormatExtractor};
use crate::error::{ExtractError, Result};
use exif::{Context, In, Tag};
use image::ImageReader;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

const IMAGE_TYPE: &str = "image";
pub(crate) const GPS_KEY: &str = "GPS";
const ERROR_KEY: &str = "error";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    #[serde(rename = "type")]
    pub kind: String,
    pub raw_exif: BTreeMap<String, Value>,
    pub gps_decimal: Option<GpsCoordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageMetadata {
    /// El mensaje queda tanto en `error` como dentro de `raw_exif`.
    fn unreadable(message: String) -> Self {
        Self {
            kind: IMAGE_TYPE.to_string(),
            raw_exif: BTreeMap::from([(ERROR_KEY.to_string(), Value::String(message.clone()))]),
            gps_decimal: None,
            error: Some(message),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

pub struct ImageExtractor;

impl FormatExtractor for ImageExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedMetadata> {
        extract_image_metadata(path).map(ExtractedMetadata::Image)
    }
}

/// Lee el bloque EXIF de la imagen y convierte las coordenadas GPS a decimal.
///
/// Un contenedor que no se puede abrir se reporta en `error`. Un bloque EXIF
/// corrupto, en cambio, se propaga como `Err`.
pub fn extract_image_metadata(path: &Path) -> Result<ImageMetadata> {
    if let Err(error) = open_image(path) {
        warn!(path = %path.display(), %error, "no se pudo abrir la imagen");
        return Ok(ImageMetadata::unreadable(format!("cannot open image: {error}")));
    }

    let raw_exif = read_raw_exif(path)?;
    let gps_decimal = raw_exif
        .get(GPS_KEY)
        .and_then(Value::as_object)
        .and_then(gps_to_decimal);
    debug!(path = %path.display(), tags = raw_exif.len(), "EXIF leído");

    Ok(ImageMetadata {
        kind: IMAGE_TYPE.to_string(),
        raw_exif,
        gps_decimal,
        error: None,
    })
}

fn open_image(path: &Path) -> Result<(u32, u32)> {
    let reader = ImageReader::open(path)
        .map_err(|error| ExtractError::io(path, error))?
        .with_guessed_format()
        .map_err(|error| ExtractError::io(path, error))?;
    Ok(reader.into_dimensions()?)
}

fn read_raw_exif(path: &Path) -> Result<BTreeMap<String, Value>> {
    let file = File::open(path).map_err(|error| ExtractError::io(path, error))?;
    let mut bufreader = BufReader::new(file);
    let exif = match exif::Reader::new().read_from_container(&mut bufreader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(BTreeMap::new()),
        Err(error) => return Err(error.into()),
    };

    Ok(decode_fields(exif.fields()))
}

/// Decodifica los campos del IFD primario; los del GPS quedan anidados bajo `GPS`.
pub(crate) fn decode_fields<'a>(
    fields: impl Iterator<Item = &'a exif::Field>,
) -> BTreeMap<String, Value> {
    let mut decoded = BTreeMap::new();
    let mut gps = Map::new();

    for field in fields.filter(|field| field.ifd_num == In::PRIMARY) {
        let key = tag_name(field.tag);
        let value = exif_value_to_json(&field.value);
        if field.tag.context() == Context::Gps {
            gps.insert(key, value);
        } else {
            decoded.insert(key, value);
        }
    }

    if !gps.is_empty() {
        decoded.insert(GPS_KEY.to_string(), Value::Object(gps));
    }
    decoded
}

/// Nombre legible de la etiqueta o su número si no figura en la tabla.
fn tag_name(tag: Tag) -> String {
    if tag.description().is_some() {
        tag.to_string()
    } else {
        tag.number().to_string()
    }
}

fn exif_value_to_json(value: &exif::Value) -> Value {
    match value {
        exif::Value::Byte(values) => collapse(values.iter().map(|v| Value::from(*v))),
        exif::Value::Ascii(values) => collapse(values.iter().map(|bytes| {
            Value::String(
                String::from_utf8_lossy(bytes)
                    .trim_end_matches('\0')
                    .to_string(),
            )
        })),
        exif::Value::Short(values) => collapse(values.iter().map(|v| Value::from(*v))),
        exif::Value::Long(values) => collapse(values.iter().map(|v| Value::from(*v))),
        exif::Value::Rational(values) => collapse(
            values
                .iter()
                .map(|r| Value::Array(vec![Value::from(r.num), Value::from(r.denom)])),
        ),
        exif::Value::SByte(values) => collapse(values.iter().map(|v| Value::from(*v))),
        exif::Value::Undefined(bytes, _) => Value::String(to_hex(bytes)),
        exif::Value::SShort(values) => collapse(values.iter().map(|v| Value::from(*v))),
        exif::Value::SLong(values) => collapse(values.iter().map(|v| Value::from(*v))),
        exif::Value::SRational(values) => collapse(
            values
                .iter()
                .map(|r| Value::Array(vec![Value::from(r.num), Value::from(r.denom)])),
        ),
        exif::Value::Float(values) => collapse(values.iter().map(|v| Value::from(f64::from(*v)))),
        exif::Value::Double(values) => collapse(values.iter().map(|v| Value::from(*v))),
        exif::Value::Unknown(..) => Value::Null,
    }
}

fn collapse(values: impl Iterator<Item = Value>) -> Value {
    let mut items: Vec<Value> = values.collect();
    if items.len() == 1 {
        items.remove(0)
    } else {
        Value::Array(items)
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Convierte la latitud y longitud GPS (grados, minutos, segundos) a grados decimales.
///
/// Devuelve `None` si falta alguna clave o algún racional es inválido.
pub fn gps_to_decimal(gps: &Map<String, Value>) -> Option<GpsCoordinates> {
    let mut latitude = dms_to_degrees(gps.get("GPSLatitude")?)?;
    if hemisphere_is(gps, "GPSLatitudeRef", "S") {
        latitude = -latitude;
    }

    let mut longitude = dms_to_degrees(gps.get("GPSLongitude")?)?;
    if hemisphere_is(gps, "GPSLongitudeRef", "W") {
        longitude = -longitude;
    }

    Some(GpsCoordinates {
        latitude,
        longitude,
    })
}

fn hemisphere_is(gps: &Map<String, Value>, key: &str, expected: &str) -> bool {
    let reference = match gps.get(key) {
        Some(Value::Array(items)) => items.first(),
        other => other,
    };
    reference
        .and_then(Value::as_str)
        .is_some_and(|reference| reference.trim().eq_ignore_ascii_case(expected))
}

fn dms_to_degrees(value: &Value) -> Option<f64> {
    let parts = value.as_array()?;
    let degrees = rational(parts.first()?)?;
    let minutes = rational(parts.get(1)?)?;
    let seconds = rational(parts.get(2)?)?;
    Some(degrees + minutes / 60.0 + seconds / 3600.0)
}

fn rational(value: &Value) -> Option<f64> {
    let pair = value.as_array()?;
    let numerator = pair.first()?.as_f64()?;
    let denominator = pair.get(1)?.as_f64()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}
