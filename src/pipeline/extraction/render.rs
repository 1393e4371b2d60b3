//! PDF page-to-image extraction for the OCR fallback path.
//!
//! Scanned PDFs usually carry one full-page image XObject per page.
//! Pulling that image out with lopdf avoids a native PDF rasterizer.

use image::ImageOutputFormat;
use lopdf::{Document, Object, ObjectId};

use super::types::PdfPageRenderer;
use super::ExtractionError;

/// Extracts the embedded page scan from a PDF page and re-encodes it as
/// PNG for the OCR engine.
pub struct PageImageExtractor;

impl PdfPageRenderer for PageImageExtractor {
    fn render_page(&self, pdf_bytes: &[u8], page_index: usize) -> Result<Vec<u8>, ExtractionError> {
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(format!("failed to parse PDF: {e}")))?;

        let page_ids: Vec<ObjectId> = doc.page_iter().collect();
        let &page_id = page_ids.get(page_index).ok_or_else(|| {
            ExtractionError::PdfParsing(format!(
                "page {} not found (PDF has {} pages)",
                page_index,
                page_ids.len()
            ))
        })?;

        let image_bytes = largest_image_on_page(&doc, page_id)?;

        let img = image::load_from_memory(&image_bytes).map_err(|e| {
            ExtractionError::ImageProcessing(format!("failed to decode page image: {e}"))
        })?;

        let mut png_buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut png_buf, ImageOutputFormat::Png)
            .map_err(|e| ExtractionError::ImageProcessing(format!("failed to encode PNG: {e}")))?;

        tracing::debug!(
            page = page_index,
            raw_size = image_bytes.len(),
            png_size = png_buf.get_ref().len(),
            "extracted image from PDF page"
        );

        Ok(png_buf.into_inner())
    }
}

/// Walk page dict → /Resources → /XObject and return the bytes of the
/// largest /Image entry (the main page scan).
fn largest_image_on_page(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>, ExtractionError> {
    let page_dict = doc
        .get_object(page_id)
        .map_err(|e| ExtractionError::PdfParsing(format!("page object error: {e}")))?
        .as_dict()
        .map_err(|_| ExtractionError::PdfParsing("page is not a dictionary".into()))?;

    let resources = resolve_dict_entry(doc, page_dict, b"Resources")?;
    let xobjects = resolve_dict_entry(doc, resources, b"XObject")?;

    let mut largest: Option<Vec<u8>> = None;

    for (_name, obj_ref) in xobjects.iter() {
        let xobj = resolve_object(doc, obj_ref);
        let stream = match xobj {
            Object::Stream(ref s) => s,
            _ => continue,
        };
        if !is_image_subtype(&stream.dict) {
            continue;
        }

        let image_bytes = stream_image_bytes(&stream.dict, stream)?;
        if largest
            .as_ref()
            .map_or(true, |prev| image_bytes.len() > prev.len())
        {
            largest = Some(image_bytes);
        }
    }

    largest
        .ok_or_else(|| ExtractionError::PdfParsing("no image XObjects found on this page".into()))
}

fn is_image_subtype(dict: &lopdf::Dictionary) -> bool {
    dict.get(b"Subtype")
        .map(|obj| matches!(obj, Object::Name(ref n) if n == b"Image"))
        .unwrap_or(false)
}

/// Pull decodable image bytes out of a PDF stream.
///
/// DCTDecode streams are JPEG files as-is. Other filters are decompressed
/// and either decoded directly (full image files embedded in the stream)
/// or reconstructed from raw pixel data.
fn stream_image_bytes(
    dict: &lopdf::Dictionary,
    stream: &lopdf::Stream,
) -> Result<Vec<u8>, ExtractionError> {
    let is_dct = dict
        .get(b"Filter")
        .map(|f| match f {
            Object::Name(n) => n == b"DCTDecode",
            Object::Array(arr) => arr
                .iter()
                .any(|o| matches!(o, Object::Name(ref n) if n == b"DCTDecode")),
            _ => false,
        })
        .unwrap_or(false);

    let content = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    if is_dct || image::load_from_memory(&content).is_ok() {
        return Ok(content);
    }

    reconstruct_raw_image(dict, &content)
}

/// Upper bound on a reconstructed raw image; declared dimensions past
/// this are treated as a malformed PDF.
const MAX_RAW_IMAGE_BYTES: u64 = 256 * 1024 * 1024;

/// Rebuild an image from raw pixel data using /Width, /Height,
/// /BitsPerComponent and /ColorSpace.
fn reconstruct_raw_image(
    dict: &lopdf::Dictionary,
    raw_pixels: &[u8],
) -> Result<Vec<u8>, ExtractionError> {
    let width_raw = get_int(dict, b"Width")?;
    let height_raw = get_int(dict, b"Height")?;
    let bpc = get_int(dict, b"BitsPerComponent").unwrap_or(8);
    let channels = color_space_channels(dict);

    if width_raw <= 0 || height_raw <= 0 || bpc <= 0 {
        return Err(ExtractionError::ImageProcessing(format!(
            "invalid image geometry: {width_raw}x{height_raw} at {bpc} bits per component"
        )));
    }

    // Size math in u64: declared dimensions are attacker-controlled and
    // must not overflow or allocate unbounded buffers.
    let expected_size =
        width_raw as u64 * height_raw as u64 * u64::from(channels) * bpc as u64 / 8;
    if expected_size == 0 || expected_size > MAX_RAW_IMAGE_BYTES {
        return Err(ExtractionError::ImageProcessing(format!(
            "implausible raw image size: {expected_size} bytes for {width_raw}x{height_raw}"
        )));
    }
    if (raw_pixels.len() as u64) < expected_size {
        return Err(ExtractionError::ImageProcessing(format!(
            "raw pixel buffer too small: {} bytes, expected {expected_size}",
            raw_pixels.len()
        )));
    }

    let width = width_raw as u32;
    let height = height_raw as u32;

    let img = match channels {
        1 => image::GrayImage::from_raw(width, height, raw_pixels.to_vec())
            .map(image::DynamicImage::ImageLuma8),
        3 => image::RgbImage::from_raw(width, height, raw_pixels.to_vec())
            .map(image::DynamicImage::ImageRgb8),
        4 => image::RgbaImage::from_raw(width, height, raw_pixels.to_vec())
            .map(image::DynamicImage::ImageRgba8),
        _ => {
            return Err(ExtractionError::ImageProcessing(format!(
                "unsupported channel count: {channels}"
            )));
        }
    }
    .ok_or_else(|| ExtractionError::ImageProcessing("failed to build image buffer".into()))?;

    let mut png_buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut png_buf, ImageOutputFormat::Png)
        .map_err(|e| ExtractionError::ImageProcessing(format!("PNG encode failed: {e}")))?;

    Ok(png_buf.into_inner())
}

fn color_space_channels(dict: &lopdf::Dictionary) -> u32 {
    match dict.get(b"ColorSpace") {
        Ok(Object::Name(ref n)) => match n.as_slice() {
            b"DeviceGray" => 1,
            b"DeviceCMYK" => 4,
            _ => 3,
        },
        Ok(Object::Array(ref arr)) if !arr.is_empty() => {
            match &arr[0] {
                // Indexed color decodes to a single palette-index channel.
                Object::Name(ref n) if n == b"Indexed" => 1,
                _ => 3,
            }
        }
        _ => 3,
    }
}

fn resolve_object<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn resolve_dict_entry<'a>(
    doc: &'a Document,
    dict: &'a lopdf::Dictionary,
    key: &[u8],
) -> Result<&'a lopdf::Dictionary, ExtractionError> {
    let obj = dict.get(key).map_err(|_| {
        ExtractionError::PdfParsing(format!(
            "missing /{} in dictionary",
            String::from_utf8_lossy(key)
        ))
    })?;

    resolve_object(doc, obj).as_dict().map_err(|_| {
        ExtractionError::PdfParsing(format!(
            "/{} is not a dictionary",
            String::from_utf8_lossy(key)
        ))
    })
}

fn get_int(dict: &lopdf::Dictionary, key: &[u8]) -> Result<i64, ExtractionError> {
    dict.get(key)
        .map_err(|_| {
            ExtractionError::PdfParsing(format!(
                "missing /{} in image dictionary",
                String::from_utf8_lossy(key)
            ))
        })?
        .as_i64()
        .map_err(|_| {
            ExtractionError::PdfParsing(format!(
                "/{} is not an integer",
                String::from_utf8_lossy(key)
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;
    use lopdf::{dictionary, Stream};

    #[test]
    fn extractor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PageImageExtractor>();
    }

    fn make_test_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([128u8, 128, 128]));
        let mut jpeg_bytes = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut jpeg_bytes, ImageOutputFormat::Jpeg(85))
            .unwrap();
        jpeg_bytes.into_inner()
    }

    fn jpeg_xobject(doc: &mut Document, jpeg: Vec<u8>, width: i64, height: i64) -> ObjectId {
        let mut stream = Stream::new(
            dictionary! {
                "Type" => Object::Name(b"XObject".to_vec()),
                "Subtype" => Object::Name(b"Image".to_vec()),
                "Width" => Object::Integer(width),
                "Height" => Object::Integer(height),
                "ColorSpace" => Object::Name(b"DeviceRGB".to_vec()),
                "BitsPerComponent" => Object::Integer(8),
                "Filter" => Object::Name(b"DCTDecode".to_vec()),
                "Length" => Object::Integer(jpeg.len() as i64),
            },
            jpeg,
        );
        stream.allows_compression = false;
        doc.add_object(Object::Stream(stream))
    }

    fn finish_pdf(doc: &mut Document, page_id: ObjectId) -> Vec<u8> {
        let pages_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Pages".to_vec()),
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        });
        if let Ok(Object::Dictionary(ref mut dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
        let catalog_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Catalog".to_vec()),
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn make_scanned_pdf(jpeg_bytes: &[u8], width: i64, height: i64) -> Vec<u8> {
        let mut doc = Document::with_version("1.4");
        let img_id = jpeg_xobject(&mut doc, jpeg_bytes.to_vec(), width, height);

        let content = Stream::new(dictionary! {}, b"q 612 0 0 792 0 0 cm /Img1 Do Q".to_vec());
        let content_id = doc.add_object(Object::Stream(content));

        let page_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Page".to_vec()),
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Img1" => Object::Reference(img_id),
                },
            },
        });
        finish_pdf(&mut doc, page_id)
    }

    #[test]
    fn extracts_image_from_scanned_pdf() {
        let jpeg = make_test_jpeg(200, 300);
        let pdf_bytes = make_scanned_pdf(&jpeg, 200, 300);

        let png = PageImageExtractor.render_page(&pdf_bytes, 0).unwrap();
        assert_eq!(&png[0..4], b"\x89PNG", "should be a valid PNG header");

        let img = image::load_from_memory(&png).unwrap();
        assert_eq!(img.width(), 200);
        assert_eq!(img.height(), 300);
    }

    #[test]
    fn invalid_page_index_returns_error() {
        let jpeg = make_test_jpeg(100, 100);
        let pdf_bytes = make_scanned_pdf(&jpeg, 100, 100);

        let result = PageImageExtractor.render_page(&pdf_bytes, 5);
        assert!(result.is_err(), "page 5 should not exist in a 1-page PDF");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("not found"));
    }

    #[test]
    fn huge_declared_dimensions_are_rejected() {
        // Hostile /Width and /Height must not overflow the size math or
        // trigger a giant allocation.
        let dict = dictionary! {
            "Width" => Object::Integer(1 << 30),
            "Height" => Object::Integer(1 << 30),
            "BitsPerComponent" => Object::Integer(8),
            "ColorSpace" => Object::Name(b"DeviceRGB".to_vec()),
        };
        let err = reconstruct_raw_image(&dict, &[0u8; 16]).unwrap_err();
        assert!(err.to_string().contains("implausible raw image size"));
    }

    #[test]
    fn nonpositive_dimensions_are_rejected() {
        let dict = dictionary! {
            "Width" => Object::Integer(0),
            "Height" => Object::Integer(100),
            "BitsPerComponent" => Object::Integer(8),
            "ColorSpace" => Object::Name(b"DeviceGray".to_vec()),
        };
        let err = reconstruct_raw_image(&dict, &[0u8; 16]).unwrap_err();
        assert!(err.to_string().contains("invalid image geometry"));
    }

    #[test]
    fn extracts_largest_when_multiple_images() {
        let small_jpeg = make_test_jpeg(10, 10);
        let large_jpeg = make_test_jpeg(200, 300);

        let mut doc = Document::with_version("1.4");
        let small_id = jpeg_xobject(&mut doc, small_jpeg, 10, 10);
        let large_id = jpeg_xobject(&mut doc, large_jpeg, 200, 300);

        let content = Stream::new(
            dictionary! {},
            b"q 10 0 0 10 0 0 cm /Small Do Q q 612 0 0 792 0 0 cm /Large Do Q".to_vec(),
        );
        let content_id = doc.add_object(Object::Stream(content));

        let page_id = doc.add_object(dictionary! {
            "Type" => Object::Name(b"Page".to_vec()),
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Small" => Object::Reference(small_id),
                    "Large" => Object::Reference(large_id),
                },
            },
        });
        let pdf_bytes = finish_pdf(&mut doc, page_id);

        let png = PageImageExtractor.render_page(&pdf_bytes, 0).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!(img.width(), 200, "should extract the larger image");
        assert_eq!(img.height(), 300);
    }
}
