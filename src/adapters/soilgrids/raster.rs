//! GeoTIFF decoding for coverage rasters.

use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

use crate::domain::errors::{FetchError, FetchResult};
use crate::domain::models::SoilProperty;

/// TIFF tag GDAL uses to carry the no-data value as ASCII.
pub const GDAL_NODATA_TAG: u16 = 42113;

/// Decode a single-band raster and return the mean of its valid pixels.
///
/// Pixels that are NaN, infinite, or equal to the GDAL no-data value are
/// skipped. A raster with no valid pixel is an [`FetchError::EmptyRaster`].
pub fn decode_raster_mean(property: SoilProperty, bytes: &[u8]) -> FetchResult<f64> {
    let decode_error = |e: tiff::TiffError| FetchError::Decode {
        property,
        message: e.to_string(),
    };

    let mut decoder = Decoder::new(Cursor::new(bytes)).map_err(decode_error)?;
    let nodata = read_nodata(&mut decoder);
    let values = pixels_as_f64(decoder.read_image().map_err(decode_error)?, property)?;

    mean_of_valid(&values, nodata).ok_or(FetchError::EmptyRaster { property })
}

/// Mean of the finite values not equal to `nodata`, or `None` if there are none.
pub fn mean_of_valid(values: &[f64], nodata: Option<f64>) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && nodata.map_or(true, |nd| *v != nd))
        .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn read_nodata<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    let value = decoder
        .find_tag(Tag::from_u16_exhaustive(GDAL_NODATA_TAG))
        .ok()
        .flatten()?;
    let text = value.into_string().ok()?;
    text.trim_matches(|c: char| c == '\0' || c.is_whitespace()).parse().ok()
}

#[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
fn pixels_as_f64(image: DecodingResult, property: SoilProperty) -> FetchResult<Vec<f64>> {
    let values = match image {
        DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F64(v) => v,
        #[allow(unreachable_patterns)]
        _ => {
            return Err(FetchError::Decode {
                property,
                message: "unsupported sample format".to_string(),
            })
        }
    };
    Ok(values)
}
