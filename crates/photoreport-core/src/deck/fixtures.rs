//! Test fixtures: a minimal presentation template, sample images and an
//! in-memory deck.

use image::{GrayImage, Luma, RgbImage};
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

use super::{Frame, Picture, SlideDeck, SlideId};
use crate::error::DeckError;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Number of layouts in the fixture template.
pub(crate) const LAYOUTS: usize = 6;

/// Write a template with one master and six layouts: layout 0 is a title
/// slide (ctrTitle + subTitle idx 1), the others carry a title only.
pub(crate) fn write_template(path: &Path) {
    write_parts(path, template_parts(false));
}

/// Same as [`write_template`] but with one slide already in the deck.
pub(crate) fn write_template_with_slide(path: &Path) {
    write_parts(path, template_parts(true));
}

fn template_parts(with_slide: bool) -> Vec<(String, String)> {
    let mut parts = Vec::new();

    let mut overrides = String::from(
        r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#,
    );
    for n in 1..=LAYOUTS {
        overrides.push_str(&format!(
            r#"<Override PartName="/ppt/slideLayouts/slideLayout{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#
        ));
    }
    if with_slide {
        overrides.push_str(r#"<Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#);
    }
    parts.push((
        "[Content_Types].xml".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="PNG" ContentType="image/png"/>{overrides}</Types>"#
        ),
    ));

    parts.push((
        "_rels/.rels".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{R}/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#
        ),
    ));

    let slide_list = if with_slide {
        r#"<p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst>"#
    } else {
        ""
    };
    parts.push((
        "ppt/presentation.xml".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {NS}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>{slide_list}<p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
        ),
    ));

    let existing_slide_rel = if with_slide {
        format!(r#"<Relationship Id="rId2" Type="{R}/slide" Target="slides/slide1.xml"/>"#)
    } else {
        String::new()
    };
    parts.push((
        "ppt/_rels/presentation.xml.rels".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{R}/slideMaster" Target="slideMasters/slideMaster1.xml"/>{existing_slide_rel}</Relationships>"#
        ),
    ));

    // Master lists layouts in reverse file order so lookups must follow the
    // master's list, not file names.
    let mut layout_ids = String::new();
    let mut master_rels = String::new();
    for i in 0..LAYOUTS {
        let file_number = LAYOUTS - i;
        layout_ids.push_str(&format!(
            r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#,
            2147483649u64 + i as u64,
            i + 1
        ));
        master_rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{R}/slideLayout" Target="../slideLayouts/slideLayout{file_number}.xml"/>"#,
            i + 1
        ));
    }
    parts.push((
        "ppt/slideMasters/slideMaster1.xml".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster {NS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst>{layout_ids}</p:sldLayoutIdLst></p:sldMaster>"#
        ),
    ));
    parts.push((
        "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{REL_NS}">{master_rels}</Relationships>"#
        ),
    ));

    for i in 0..LAYOUTS {
        let file_number = LAYOUTS - i;
        let shapes = if i == 0 {
            format!("{}{}", placeholder(2, r#"type="ctrTitle""#), placeholder(3, r#"type="subTitle" idx="1""#))
        } else {
            format!("{}{}", placeholder(2, r#"type="title""#), placeholder(3, r#"type="sldNum" sz="quarter" idx="12""#))
        };
        parts.push((
            format!("ppt/slideLayouts/slideLayout{file_number}.xml"),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout {NS}><p:cSld name="Layout {i}"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld></p:sldLayout>"#
            ),
        ));
        parts.push((
            format!("ppt/slideLayouts/_rels/slideLayout{file_number}.xml.rels"),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{R}/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#
            ),
        ));
    }

    if with_slide {
        parts.push((
            "ppt/slides/slide1.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {NS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld></p:sld>"#
            ),
        ));
        parts.push((
            "ppt/slides/_rels/slide1.xml.rels".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{R}/slideLayout" Target="../slideLayouts/slideLayout6.xml"/></Relationships>"#
            ),
        ));
    }

    parts
}

fn placeholder(id: u32, ph_attrs: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Placeholder {id}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph {ph_attrs}/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#
    )
}

fn write_parts(path: &Path, parts: Vec<(String, String)>) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, content) in parts {
        writer.start_file(name.as_str(), options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

/// A high-contrast checkerboard PNG (sharp).
pub(crate) fn write_sharp_png(path: &Path) {
    let img = RgbImage::from_fn(64, 48, |x, y| {
        if (x / 4 + y / 4) % 2 == 0 {
            image::Rgb([255, 255, 255])
        } else {
            image::Rgb([0, 0, 0])
        }
    });
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// A flat grey PNG (zero Laplacian variance, always blurry).
pub(crate) fn write_flat_png(path: &Path) {
    let img = GrayImage::from_pixel(32, 32, Luma([128]));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// A noisy PNG whose pixel data is cut in half: the header parses, the
/// body does not decode.
pub(crate) fn write_truncated_png(path: &Path) {
    let mut state: u32 = 0x1234_5678;
    let img = RgbImage::from_fn(64, 64, |_, _| {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let [a, b, c, _] = state.to_le_bytes();
        image::Rgb([a, b, c])
    });
    let mut bytes = std::io::Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    let bytes = bytes.into_inner();
    std::fs::write(path, &bytes[..bytes.len() / 2]).unwrap();
}

/// One slide captured by [`RecordingDeck`].
#[derive(Debug, Default)]
pub(crate) struct RecordedSlide {
    pub layout: usize,
    pub title: Option<String>,
    pub texts: Vec<(u32, Vec<String>)>,
    pub pictures: Vec<(String, Frame)>,
}

/// In-memory deck that records every call. Pictures whose name is listed in
/// `reject` fail to insert.
#[derive(Debug)]
pub(crate) struct RecordingDeck {
    pub layouts: usize,
    pub slides: Vec<RecordedSlide>,
    pub reject: Vec<String>,
}

impl RecordingDeck {
    pub fn new(layouts: usize) -> Self {
        Self {
            layouts,
            slides: Vec::new(),
            reject: Vec::new(),
        }
    }

    fn slide(&mut self, slide: SlideId) -> Result<&mut RecordedSlide, DeckError> {
        self.slides
            .get_mut(slide.0)
            .ok_or(DeckError::UnknownSlide(slide.0))
    }
}

impl SlideDeck for RecordingDeck {
    fn layout_count(&self) -> usize {
        self.layouts
    }

    fn add_slide(&mut self, layout: usize) -> Result<SlideId, DeckError> {
        if layout >= self.layouts {
            return Err(DeckError::LayoutOutOfRange {
                index: layout,
                available: self.layouts,
            });
        }
        self.slides.push(RecordedSlide {
            layout,
            ..Default::default()
        });
        Ok(SlideId(self.slides.len() - 1))
    }

    fn set_title(&mut self, slide: SlideId, text: &str) -> Result<(), DeckError> {
        self.slide(slide)?.title = Some(text.to_string());
        Ok(())
    }

    fn set_placeholder_text(
        &mut self,
        slide: SlideId,
        idx: u32,
        lines: &[String],
    ) -> Result<(), DeckError> {
        self.slide(slide)?.texts.push((idx, lines.to_vec()));
        Ok(())
    }

    fn add_picture(
        &mut self,
        slide: SlideId,
        picture: Picture,
        frame: Frame,
    ) -> Result<(), DeckError> {
        if self.reject.contains(&picture.name) {
            return Err(DeckError::MalformedPart {
                part: picture.name,
                message: "rejected".into(),
            });
        }
        self.slide(slide)?.pictures.push((picture.name, frame));
        Ok(())
    }

    fn slide_count(&self) -> usize {
        self.slides.len()
    }
}
