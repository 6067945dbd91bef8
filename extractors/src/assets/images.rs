use lopdf::{Dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

/// Writes the raster images embedded in a PDF to an output directory.
///
/// Files are named `page{P}_img{I}.{ext}` with 1-based page and in-page
/// indices, and returned in page order then in-page order.
#[derive(Debug, Clone)]
pub struct ImageExtractor {
    output_dir: PathBuf,
}

enum ImageOutput {
    Encoded(&'static str, Vec<u8>),
    Png(image::DynamicImage),
}

impl ImageExtractor {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Extract every supported image; never fails
    pub fn extract(&self, pdf_path: &Path) -> Vec<PathBuf> {
        let mut written = Vec::new();

        if let Err(e) = self.extract_into(pdf_path, &mut written) {
            tracing::warn!(
                "Error extracting images from {}: {}",
                pdf_path.display(),
                e
            );
        }

        written
    }

    fn extract_into(&self, pdf_path: &Path, written: &mut Vec<PathBuf>) -> anyhow::Result<()> {
        let document = Document::load(pdf_path)?;
        std::fs::create_dir_all(&self.output_dir)?;

        for (page_number, page_id) in document.get_pages() {
            let page = document.get_dictionary(page_id)?;

            for (index, stream) in page_images(&document, page).into_iter().enumerate() {
                let stem = format!("page{}_img{}", page_number, index + 1);

                match decode_image(&document, stream) {
                    Ok(Some(output)) => {
                        let path = write_image(&self.output_dir, &stem, output)?;
                        tracing::debug!("Wrote {}", path.display());
                        written.push(path);
                    }
                    Ok(None) => {
                        tracing::info!("Skipping {}: unsupported image encoding", stem);
                    }
                    Err(e) => {
                        tracing::info!("Skipping {}: {}", stem, e);
                    }
                }
            }
        }

        Ok(())
    }
}

fn resolve<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => document.get_object(*id).ok(),
        other => Some(other),
    }
}

fn resolve_dict<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match resolve(document, object)? {
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Page resources, following `/Parent` for inherited ones
fn page_resources<'a>(document: &'a Document, page: &'a Dictionary) -> Option<&'a Dictionary> {
    let mut node = page;

    // Page trees are shallow; bound the walk in case of cycles
    for _ in 0..32 {
        if let Some(resources) = node
            .get(b"Resources")
            .ok()
            .and_then(|r| resolve_dict(document, r))
        {
            return Some(resources);
        }
        node = node
            .get(b"Parent")
            .ok()
            .and_then(|p| resolve_dict(document, p))?;
    }

    None
}

/// Image XObject streams of a page, in resource dictionary order
fn page_images<'a>(document: &'a Document, page: &'a Dictionary) -> Vec<&'a Stream> {
    let Some(xobjects) = page_resources(document, page)
        .and_then(|res| res.get(b"XObject").ok())
        .and_then(|x| resolve_dict(document, x))
    else {
        return Vec::new();
    };

    xobjects
        .iter()
        .filter_map(|(_name, obj)| match resolve(document, obj)? {
            Object::Stream(stream) => Some(stream),
            _ => None,
        })
        .filter(|stream| {
            matches!(
                stream.dict.get(b"Subtype").ok().and_then(|s| resolve(document, s)),
                Some(Object::Name(name)) if name == b"Image"
            )
        })
        .collect()
}

fn filter_names(document: &Document, stream: &Stream) -> Vec<Vec<u8>> {
    match stream.dict.get(b"Filter").ok().and_then(|f| resolve(document, f)) {
        Some(Object::Name(name)) => vec![name.clone()],
        Some(Object::Array(items)) => items
            .iter()
            .filter_map(|item| match resolve(document, item)? {
                Object::Name(name) => Some(name.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn get_integer(document: &Document, dict: &Dictionary, key: &[u8]) -> Option<i64> {
    match dict.get(key).ok().and_then(|v| resolve(document, v))? {
        Object::Integer(i) => Some(*i),
        _ => None,
    }
}

/// Colour spaces whose samples can be re-encoded as PNG
enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
    Indexed {
        base: Box<ColorSpace>,
        palette: Vec<u8>,
    },
}

impl ColorSpace {
    fn components(&self) -> usize {
        match self {
            ColorSpace::Gray | ColorSpace::Indexed { .. } => 1,
            ColorSpace::Rgb => 3,
            ColorSpace::Cmyk => 4,
        }
    }
}

fn device_space(name: &[u8]) -> Option<ColorSpace> {
    match name {
        b"DeviceGray" | b"CalGray" | b"G" => Some(ColorSpace::Gray),
        b"DeviceRGB" | b"CalRGB" | b"RGB" => Some(ColorSpace::Rgb),
        b"DeviceCMYK" | b"CMYK" => Some(ColorSpace::Cmyk),
        _ => None,
    }
}

fn color_space(document: &Document, object: &Object) -> Option<ColorSpace> {
    let items = match resolve(document, object)? {
        Object::Name(name) => return device_space(name),
        Object::Array(items) => items,
        _ => return None,
    };

    let family = match resolve(document, items.first()?)? {
        Object::Name(name) => name.as_slice(),
        _ => return None,
    };

    match family {
        b"Indexed" | b"I" => {
            let base = color_space(document, items.get(1)?)?;
            if matches!(base, ColorSpace::Indexed { .. }) {
                return None;
            }
            let palette = match resolve(document, items.get(3)?)? {
                Object::String(bytes, _) => bytes.clone(),
                Object::Stream(stream) => stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone()),
                _ => return None,
            };
            Some(ColorSpace::Indexed {
                base: Box::new(base),
                palette,
            })
        }
        b"ICCBased" => match resolve(document, items.get(1)?)? {
            Object::Stream(profile) => match get_integer(document, &profile.dict, b"N")? {
                1 => Some(ColorSpace::Gray),
                3 => Some(ColorSpace::Rgb),
                4 => Some(ColorSpace::Cmyk),
                _ => None,
            },
            _ => None,
        },
        other => device_space(other),
    }
}

/// One byte per component, unscaled; rows are padded to a byte boundary
fn unpack_samples(
    data: &[u8],
    width: usize,
    height: usize,
    components: usize,
    bits: usize,
) -> Option<Vec<u8>> {
    if !matches!(bits, 1 | 2 | 4 | 8) {
        return None;
    }

    let per_row = width * components;
    let row_bytes = (per_row * bits).div_ceil(8);
    if data.len() < row_bytes * height {
        return None;
    }

    if bits == 8 {
        return Some(data[..per_row * height].to_vec());
    }

    let mask = (1u16 << bits) - 1;
    let mut values = Vec::with_capacity(per_row * height);
    for row in data.chunks(row_bytes).take(height) {
        for i in 0..per_row {
            let offset = i * bits;
            let shift = 8 - bits - offset % 8;
            values.push(((u16::from(row[offset / 8]) >> shift) & mask) as u8);
        }
    }

    Some(values)
}

fn scale_to_byte(value: u8, bits: usize) -> u8 {
    if bits == 8 {
        value
    } else {
        (u16::from(value) * 255 / ((1u16 << bits) - 1)) as u8
    }
}

/// RGB of one 8-bit pixel in a non-indexed space
fn pixel_rgb(space: &ColorSpace, px: &[u8]) -> Option<[u8; 3]> {
    match (space, px) {
        (ColorSpace::Gray, [g]) => Some([*g, *g, *g]),
        (ColorSpace::Rgb, [r, g, b]) => Some([*r, *g, *b]),
        (ColorSpace::Cmyk, [c, m, y, k]) => {
            let white = 255 - u16::from(*k);
            let channel = |v: u8| ((255 - u16::from(v)) * white / 255) as u8;
            Some([channel(*c), channel(*m), channel(*y)])
        }
        _ => None,
    }
}

fn render(
    space: &ColorSpace,
    values: &[u8],
    bits: usize,
    width: u32,
    height: u32,
) -> Option<image::DynamicImage> {
    let rgb: Vec<u8> = match space {
        ColorSpace::Gray => {
            let luma = values.iter().map(|v| scale_to_byte(*v, bits)).collect();
            return image::GrayImage::from_raw(width, height, luma)
                .map(image::DynamicImage::ImageLuma8);
        }
        ColorSpace::Rgb | ColorSpace::Cmyk => {
            let scaled: Vec<u8> = values.iter().map(|v| scale_to_byte(*v, bits)).collect();
            scaled
                .chunks_exact(space.components())
                .flat_map(|px| pixel_rgb(space, px).unwrap_or_default())
                .collect()
        }
        ColorSpace::Indexed { base, palette } => {
            let n = base.components();
            values
                .iter()
                .flat_map(|index| {
                    let start = usize::from(*index) * n;
                    palette
                        .get(start..start + n)
                        .and_then(|entry| pixel_rgb(base, entry))
                        .unwrap_or_default()
                })
                .collect()
        }
    };

    image::RgbImage::from_raw(width, height, rgb).map(image::DynamicImage::ImageRgb8)
}

fn decode_image(document: &Document, stream: &Stream) -> anyhow::Result<Option<ImageOutput>> {
    let filters = filter_names(document, stream);

    let samples = match filters.iter().map(Vec::as_slice).collect::<Vec<_>>().as_slice() {
        [b"DCTDecode"] => return Ok(Some(ImageOutput::Encoded("jpg", stream.content.clone()))),
        [b"JPXDecode"] => return Ok(Some(ImageOutput::Encoded("jp2", stream.content.clone()))),
        [] => stream.content.clone(),
        [b"FlateDecode"] => stream.decompressed_content()?,
        _ => return Ok(None),
    };

    let width = get_integer(document, &stream.dict, b"Width").unwrap_or(0);
    let height = get_integer(document, &stream.dict, b"Height").unwrap_or(0);
    let bits = get_integer(document, &stream.dict, b"BitsPerComponent").unwrap_or(8);
    if width <= 0 || height <= 0 {
        return Ok(None);
    }
    let (width, height, bits) = (u32::try_from(width)?, u32::try_from(height)?, usize::try_from(bits)?);

    let Some(space) = stream
        .dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|cs| color_space(document, cs))
    else {
        return Ok(None);
    };

    let image = unpack_samples(
        &samples,
        width as usize,
        height as usize,
        space.components(),
        bits,
    )
    .and_then(|values| render(&space, &values, bits, width, height));

    Ok(image.map(ImageOutput::Png))
}

fn write_image(output_dir: &Path, stem: &str, output: ImageOutput) -> anyhow::Result<PathBuf> {
    match output {
        ImageOutput::Encoded(ext, bytes) => {
            let path = output_dir.join(format!("{}.{}", stem, ext));
            std::fs::write(&path, bytes)?;
            Ok(path)
        }
        ImageOutput::Png(image) => {
            let path = output_dir.join(format!("{}.png", stem));
            image.save_with_format(&path, image::ImageFormat::Png)?;
            Ok(path)
        }
    }
}
