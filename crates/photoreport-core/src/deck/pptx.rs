//! Presentation package (.pptx) opened from a template.
//!
//! Every part of the template is held in memory. New slides, their
//! relationships and embedded media are kept as drafts and serialized on
//! [`PptxDeck::save`], together with the patched `presentation.xml`, its
//! relationships and `[Content_Types].xml`.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::xml::{self, Relationship};
use super::{Frame, Picture, SlideDeck, SlideId};
use crate::error::DeckError;

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const REL_PACKAGE_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CONTENT_TYPES: &str = "[Content_Types].xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const SLIDE_ID_MIN: u32 = 256;

const SLIDE_OPEN: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
    r#"<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
);
const SLIDE_CLOSE: &str =
    r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#;

/// Placeholder kinds a new slide does not inherit from its layout.
const SKIPPED_PLACEHOLDERS: [&str; 3] = ["dt", "ftr", "sldNum"];

#[derive(Debug, Clone)]
struct PlaceholderSpec {
    kind: Option<String>,
    idx: u32,
}

impl PlaceholderSpec {
    fn is_title(&self) -> bool {
        matches!(self.kind.as_deref(), Some("title") | Some("ctrTitle"))
    }

    fn display_name(&self) -> &'static str {
        match self.kind.as_deref() {
            Some("title") | Some("ctrTitle") => "Title",
            Some("subTitle") => "Subtitle",
            Some("pic") => "Picture Placeholder",
            None | Some("body") => "Text Placeholder",
            _ => "Placeholder",
        }
    }
}

#[derive(Debug, Clone)]
struct LayoutInfo {
    part: String,
    placeholders: Vec<PlaceholderSpec>,
}

#[derive(Debug)]
enum Shape {
    Placeholder {
        spec: PlaceholderSpec,
        paragraphs: Vec<String>,
    },
    Picture {
        rel_id: String,
        descr: String,
        frame: Frame,
    },
}

#[derive(Debug)]
struct SlideDraft {
    part: String,
    layout_part: String,
    shapes: Vec<Shape>,
    /// (relationship id, media part)
    images: Vec<(String, String)>,
}

#[derive(Debug)]
struct MediaPart {
    part: String,
    extension: &'static str,
    content_type: &'static str,
    bytes: Vec<u8>,
}

/// A presentation opened from a template file.
pub struct PptxDeck {
    parts: Vec<(String, Vec<u8>)>,
    presentation_part: String,
    layouts: Vec<LayoutInfo>,
    slides: Vec<SlideDraft>,
    media: Vec<MediaPart>,
    next_slide_number: u32,
    next_media_number: u32,
}

impl PptxDeck {
    /// Open a presentation package and index the first master's layouts.
    pub fn open(path: &Path) -> Result<Self, DeckError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut bytes)?;
            parts.push((name, bytes));
        }

        Self::from_parts(parts)
    }

    fn from_parts(parts: Vec<(String, Vec<u8>)>) -> Result<Self, DeckError> {
        let presentation_part = find_presentation_part(&parts)?;
        let layouts = resolve_layouts(&parts, &presentation_part)?;

        let next_slide_number = max_part_number(&parts, "ppt/slides/slide", ".xml") + 1;
        let next_media_number = max_part_number(&parts, "ppt/media/image", ".") + 1;

        tracing::debug!(
            "Opened presentation with {} layouts ({})",
            layouts.len(),
            presentation_part
        );

        Ok(Self {
            parts,
            presentation_part,
            layouts,
            slides: Vec::new(),
            media: Vec::new(),
            next_slide_number,
            next_media_number,
        })
    }

    /// Write the presentation, including every slide added so far.
    pub fn save(&self, path: &Path) -> Result<(), DeckError> {
        let parts = self.assemble()?;

        let file = File::create(path)?;
        let mut writer = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        // [Content_Types].xml leads the archive.
        let ordered = parts
            .iter()
            .filter(|(name, _)| name == CONTENT_TYPES)
            .chain(parts.iter().filter(|(name, _)| name != CONTENT_TYPES));
        for (name, bytes) in ordered {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(bytes)?;
        }

        let mut inner = writer.finish()?;
        inner.flush()?;
        Ok(())
    }

    /// Descriptions of the pictures on every slide of the package, in slide
    /// order. Only slides already stored in the package are listed.
    pub fn slide_pictures(&self) -> Result<Vec<Vec<String>>, DeckError> {
        let presentation = part_text(&self.parts, &self.presentation_part)?;
        let rels = relationships_of(&self.parts, &self.presentation_part)?;

        xml::tags(presentation, "sldId")
            .iter()
            .map(|attrs| {
                let rel_id = attrs.get("r:id").ok_or_else(|| DeckError::MalformedPart {
                    part: self.presentation_part.clone(),
                    message: "sldId without r:id".into(),
                })?;
                let slide_part = target_of(&rels, rel_id, &self.presentation_part)?;
                let slide = part_text(&self.parts, &slide_part)?;
                Ok(xml::tags(slide, "cNvPr")
                    .iter()
                    .filter_map(|attrs| attrs.get("descr").map(str::to_string))
                    .collect())
            })
            .collect()
    }

    /// Raw text of a package part.
    pub fn part_text(&self, name: &str) -> Result<&str, DeckError> {
        part_text(&self.parts, name)
    }

    fn draft_mut(&mut self, slide: SlideId) -> Result<&mut SlideDraft, DeckError> {
        self.slides
            .get_mut(slide.0)
            .ok_or(DeckError::UnknownSlide(slide.0))
    }

    fn assemble(&self) -> Result<Vec<(String, Vec<u8>)>, DeckError> {
        let mut parts = self.parts.clone();
        if self.slides.is_empty() {
            return Ok(parts);
        }

        self.register_slides(&mut parts)?;
        self.register_content_types(&mut parts)?;

        for slide in &self.slides {
            parts.push((slide.part.clone(), render_slide(slide).into_bytes()));
            parts.push((
                xml::rels_path(&slide.part),
                render_slide_rels(slide).into_bytes(),
            ));
        }
        for media in &self.media {
            parts.push((media.part.clone(), media.bytes.clone()));
        }
        Ok(parts)
    }

    /// Append the new slides to the presentation's relationships and slide list.
    fn register_slides(&self, parts: &mut Vec<(String, Vec<u8>)>) -> Result<(), DeckError> {
        let rels_part = xml::rels_path(&self.presentation_part);
        let rels_xml = part_text(parts, &rels_part)?.to_string();
        let presentation = part_text(parts, &self.presentation_part)?.to_string();

        let existing = xml::relationships(&rels_xml);
        let mut next_rel = xml::max_numbered(existing.iter().map(|r| r.id.as_str()), "rId") + 1;
        let mut next_id = xml::tags(&presentation, "sldId")
            .iter()
            .filter_map(|attrs| attrs.get("id")?.parse::<u32>().ok())
            .max()
            .unwrap_or(SLIDE_ID_MIN - 1)
            .max(SLIDE_ID_MIN - 1)
            + 1;

        let mut rel_entries = String::new();
        let mut id_entries = String::new();
        for slide in &self.slides {
            let rel_id = format!("rId{next_rel}");
            next_rel += 1;
            rel_entries.push_str(&format!(
                r#"<Relationship Id="{rel_id}" Type="{REL_BASE}/slide" Target="{}"/>"#,
                xml::relative_target(&self.presentation_part, &slide.part)
            ));
            id_entries.push_str(&format!(r#"<p:sldId id="{next_id}" r:id="{rel_id}"/>"#));
            next_id += 1;
        }

        let rels_xml = xml::insert_before(&rels_xml, "</Relationships>", &rel_entries)
            .ok_or_else(|| malformed(&rels_part, "missing </Relationships>"))?;
        let presentation = insert_slide_ids(&presentation, &id_entries)
            .ok_or_else(|| malformed(&self.presentation_part, "no place for the slide list"))?;

        set_part(parts, &rels_part, rels_xml.into_bytes());
        set_part(parts, &self.presentation_part, presentation.into_bytes());
        Ok(())
    }

    fn register_content_types(&self, parts: &mut Vec<(String, Vec<u8>)>) -> Result<(), DeckError> {
        let types = part_text(parts, CONTENT_TYPES)?.to_string();

        let mut known: HashSet<String> = xml::tags(&types, "Default")
            .iter()
            .filter_map(|attrs| attrs.get("Extension").map(str::to_ascii_lowercase))
            .collect();

        let mut additions = String::new();
        for media in &self.media {
            if known.insert(media.extension.to_string()) {
                additions.push_str(&format!(
                    r#"<Default Extension="{}" ContentType="{}"/>"#,
                    media.extension, media.content_type
                ));
            }
        }
        for slide in &self.slides {
            additions.push_str(&format!(
                r#"<Override PartName="/{}" ContentType="{CT_SLIDE}"/>"#,
                slide.part
            ));
        }

        let types = xml::insert_before(&types, "</Types>", &additions)
            .ok_or_else(|| malformed(CONTENT_TYPES, "missing </Types>"))?;
        set_part(parts, CONTENT_TYPES, types.into_bytes());
        Ok(())
    }
}

impl SlideDeck for PptxDeck {
    fn layout_count(&self) -> usize {
        self.layouts.len()
    }

    fn add_slide(&mut self, layout: usize) -> Result<SlideId, DeckError> {
        let info = self
            .layouts
            .get(layout)
            .ok_or(DeckError::LayoutOutOfRange {
                index: layout,
                available: self.layouts.len(),
            })?;

        let shapes = info
            .placeholders
            .iter()
            .filter(|spec| {
                !matches!(spec.kind.as_deref(), Some(kind) if SKIPPED_PLACEHOLDERS.contains(&kind))
            })
            .map(|spec| Shape::Placeholder {
                spec: spec.clone(),
                paragraphs: Vec::new(),
            })
            .collect();
        let draft = SlideDraft {
            part: format!("ppt/slides/slide{}.xml", self.next_slide_number),
            layout_part: info.part.clone(),
            shapes,
            images: Vec::new(),
        };

        self.next_slide_number += 1;
        self.slides.push(draft);
        Ok(SlideId(self.slides.len() - 1))
    }

    fn set_title(&mut self, slide: SlideId, text: &str) -> Result<(), DeckError> {
        let draft = self.draft_mut(slide)?;
        let title = draft.shapes.iter_mut().find_map(|shape| match shape {
            Shape::Placeholder { spec, paragraphs } if spec.is_title() => Some(paragraphs),
            _ => None,
        });
        match title {
            Some(paragraphs) => {
                *paragraphs = vec![text.to_string()];
                Ok(())
            }
            None => Err(DeckError::MissingPlaceholder {
                slide: slide.0,
                placeholder: "title".into(),
            }),
        }
    }

    fn set_placeholder_text(
        &mut self,
        slide: SlideId,
        idx: u32,
        lines: &[String],
    ) -> Result<(), DeckError> {
        let draft = self.draft_mut(slide)?;
        let target = draft.shapes.iter_mut().find_map(|shape| match shape {
            Shape::Placeholder { spec, paragraphs } if spec.idx == idx => Some(paragraphs),
            _ => None,
        });
        match target {
            Some(paragraphs) => {
                *paragraphs = lines.to_vec();
                Ok(())
            }
            None => Err(DeckError::MissingPlaceholder {
                slide: slide.0,
                placeholder: format!("idx {idx}"),
            }),
        }
    }

    fn add_picture(
        &mut self,
        slide: SlideId,
        picture: Picture,
        frame: Frame,
    ) -> Result<(), DeckError> {
        let (extension, content_type) = picture.media_type();
        let media_part = format!("ppt/media/image{}.{extension}", self.next_media_number);

        let draft = self.draft_mut(slide)?;
        // rId1 is the layout relationship.
        let rel_id = format!("rId{}", draft.images.len() + 2);
        draft.images.push((rel_id.clone(), media_part.clone()));
        draft.shapes.push(Shape::Picture {
            rel_id,
            descr: picture.name,
            frame,
        });

        self.next_media_number += 1;
        self.media.push(MediaPart {
            part: media_part,
            extension,
            content_type,
            bytes: picture.bytes,
        });
        Ok(())
    }

    fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

fn malformed(part: &str, message: &str) -> DeckError {
    DeckError::MalformedPart {
        part: part.to_string(),
        message: message.to_string(),
    }
}

fn part_text<'a>(parts: &'a [(String, Vec<u8>)], name: &str) -> Result<&'a str, DeckError> {
    let (_, bytes) = parts
        .iter()
        .find(|(part, _)| part == name)
        .ok_or_else(|| DeckError::MissingPart(name.to_string()))?;
    let text = std::str::from_utf8(bytes).map_err(|e| malformed(name, &e.to_string()))?;
    Ok(text.trim_start_matches('\u{feff}'))
}

fn set_part(parts: &mut Vec<(String, Vec<u8>)>, name: &str, bytes: Vec<u8>) {
    match parts.iter_mut().find(|(part, _)| part == name) {
        Some((_, existing)) => *existing = bytes,
        None => parts.push((name.to_string(), bytes)),
    }
}

fn relationships_of(
    parts: &[(String, Vec<u8>)],
    owner: &str,
) -> Result<Vec<Relationship>, DeckError> {
    Ok(xml::relationships(part_text(parts, &xml::rels_path(owner))?))
}

fn target_of(rels: &[Relationship], id: &str, owner: &str) -> Result<String, DeckError> {
    rels.iter()
        .find(|rel| rel.id == id)
        .map(|rel| xml::resolve_target(owner, &rel.target))
        .ok_or_else(|| malformed(&xml::rels_path(owner), &format!("no relationship {id}")))
}

fn find_presentation_part(parts: &[(String, Vec<u8>)]) -> Result<String, DeckError> {
    if let Ok(rels) = part_text(parts, "_rels/.rels") {
        if let Some(rel) = xml::relationships(rels)
            .into_iter()
            .find(|rel| rel.kind.ends_with("/officeDocument"))
        {
            return Ok(xml::resolve_target("", &rel.target));
        }
    }
    let fallback = "ppt/presentation.xml";
    if parts.iter().any(|(name, _)| name == fallback) {
        Ok(fallback.to_string())
    } else {
        Err(DeckError::MissingPart(fallback.to_string()))
    }
}

/// Layouts of the first slide master, in the master's order.
fn resolve_layouts(
    parts: &[(String, Vec<u8>)],
    presentation_part: &str,
) -> Result<Vec<LayoutInfo>, DeckError> {
    let presentation = part_text(parts, presentation_part)?;
    let master_rel = xml::tags(presentation, "sldMasterId")
        .first()
        .and_then(|attrs| attrs.get("r:id").map(str::to_string))
        .ok_or_else(|| malformed(presentation_part, "no slide master"))?;
    let master_part = target_of(
        &relationships_of(parts, presentation_part)?,
        &master_rel,
        presentation_part,
    )?;

    let master = part_text(parts, &master_part)?;
    let master_rels = relationships_of(parts, &master_part)?;

    xml::tags(master, "sldLayoutId")
        .iter()
        .map(|attrs| {
            let rel_id = attrs
                .get("r:id")
                .ok_or_else(|| malformed(&master_part, "sldLayoutId without r:id"))?;
            let part = target_of(&master_rels, rel_id, &master_part)?;
            let layout = part_text(parts, &part)?;
            let placeholders = xml::tags(layout, "ph")
                .iter()
                .map(|ph| PlaceholderSpec {
                    kind: ph.get("type").map(str::to_string),
                    idx: ph.get("idx").and_then(|v| v.parse().ok()).unwrap_or(0),
                })
                .collect();
            Ok(LayoutInfo { part, placeholders })
        })
        .collect()
}

fn max_part_number(parts: &[(String, Vec<u8>)], prefix: &str, suffix_start: &str) -> u32 {
    parts
        .iter()
        .filter_map(|(name, _)| {
            let rest = name.strip_prefix(prefix)?;
            let end = rest.find(suffix_start)?;
            rest[..end].parse::<u32>().ok()
        })
        .max()
        .unwrap_or(0)
}

/// Insert `<p:sldId>` entries, creating the list after the master/notes/
/// handout id lists when the presentation has none.
fn insert_slide_ids(presentation: &str, entries: &str) -> Option<String> {
    if presentation.contains("</p:sldIdLst>") {
        return xml::insert_before(presentation, "</p:sldIdLst>", entries);
    }
    let list = format!("<p:sldIdLst>{entries}</p:sldIdLst>");
    if presentation.contains("<p:sldIdLst/>") {
        return Some(presentation.replacen("<p:sldIdLst/>", &list, 1));
    }
    let anchor = [
        "</p:handoutMasterIdLst>",
        "</p:notesMasterIdLst>",
        "</p:sldMasterIdLst>",
    ]
    .iter()
    .find_map(|tag| presentation.find(tag).map(|pos| pos + tag.len()))?;

    let mut out = String::with_capacity(presentation.len() + list.len());
    out.push_str(&presentation[..anchor]);
    out.push_str(&list);
    out.push_str(&presentation[anchor..]);
    Some(out)
}

fn render_slide(slide: &SlideDraft) -> String {
    let mut out = String::from(SLIDE_OPEN);
    for (i, shape) in slide.shapes.iter().enumerate() {
        let id = i as u32 + 2;
        match shape {
            Shape::Placeholder { spec, paragraphs } => {
                out.push_str(&render_placeholder(id, spec, paragraphs))
            }
            Shape::Picture {
                rel_id,
                descr,
                frame,
            } => out.push_str(&render_picture(id, rel_id, descr, frame)),
        }
    }
    out.push_str(SLIDE_CLOSE);
    out
}

fn render_placeholder(id: u32, spec: &PlaceholderSpec, paragraphs: &[String]) -> String {
    let mut ph = String::from("<p:ph");
    if let Some(kind) = &spec.kind {
        ph.push_str(&format!(r#" type="{}""#, xml::escape(kind)));
    }
    if spec.idx != 0 {
        ph.push_str(&format!(r#" idx="{}""#, spec.idx));
    }
    ph.push_str("/>");

    let body: String = if paragraphs.is_empty() {
        "<a:p/>".to_string()
    } else {
        paragraphs
            .iter()
            .map(|text| {
                format!(
                    r#"<a:p><a:r><a:rPr lang="pt-BR" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
                    xml::escape(text)
                )
            })
            .collect()
    };

    format!(
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name} {n}"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{ph}</p:nvPr></p:nvSpPr>"#,
            r#"<p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{body}</p:txBody></p:sp>"#
        ),
        id = id,
        name = spec.display_name(),
        n = id - 1,
        ph = ph,
        body = body
    )
}

fn render_picture(id: u32, rel_id: &str, descr: &str, frame: &Frame) -> String {
    format!(
        concat!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {n}" descr="{descr}"/>"#,
            r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
            r#"<p:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
            r#"<p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
        ),
        id = id,
        n = id - 1,
        descr = xml::escape(descr),
        rel_id = rel_id,
        x = frame.left.0,
        y = frame.top.0,
        cx = frame.width.0,
        cy = frame.height.0
    )
}

fn render_slide_rels(slide: &SlideDraft) -> String {
    let mut out = format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="{ns}"><Relationship Id="rId1" Type="{base}/slideLayout" Target="{layout}"/>"#
        ),
        ns = REL_PACKAGE_NS,
        base = REL_BASE,
        layout = xml::relative_target(&slide.part, &slide.layout_part)
    );
    for (rel_id, media_part) in &slide.images {
        out.push_str(&format!(
            r#"<Relationship Id="{rel_id}" Type="{REL_BASE}/image" Target="{}"/>"#,
            xml::relative_target(&slide.part, media_part)
        ));
    }
    out.push_str("</Relationships>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::fixtures;
    use crate::deck::Emu;
    use image::ImageFormat;

    fn picture(name: &str, format: ImageFormat) -> Picture {
        Picture {
            name: name.to_string(),
            format,
            bytes: vec![1, 2, 3],
        }
    }

    fn frame() -> Frame {
        Frame {
            left: Emu::from_cm(1.0),
            top: Emu::from_cm(2.0),
            width: Emu::from_cm(10.0),
            height: Emu::from_cm(7.5),
        }
    }

    fn open_fixture(dir: &Path) -> PptxDeck {
        let template = dir.join("template.pptx");
        fixtures::write_template(&template);
        PptxDeck::open(&template).unwrap()
    }

    #[test]
    fn test_open_indexes_layouts_in_master_order() {
        let dir = tempfile::tempdir().unwrap();
        let deck = open_fixture(dir.path());
        assert_eq!(deck.layout_count(), fixtures::LAYOUTS);
        // The master lists slideLayout6 first.
        assert_eq!(deck.layouts[0].part, "ppt/slideLayouts/slideLayout6.xml");
        assert!(deck.layouts[0].placeholders.iter().any(|p| p.is_title()));
        assert!(deck.layouts[0].placeholders.iter().any(|p| p.idx == 1));
    }

    #[test]
    fn test_open_rejects_non_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pptx");
        std::fs::write(&path, b"not a zip").unwrap();
        assert!(matches!(PptxDeck::open(&path), Err(DeckError::Zip(_))));
    }

    #[test]
    fn test_layout_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let mut deck = open_fixture(dir.path());
        let err = deck.add_slide(42).unwrap_err();
        assert!(matches!(
            err,
            DeckError::LayoutOutOfRange {
                index: 42,
                available: 6
            }
        ));
    }

    #[test]
    fn test_placeholders_filled_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut deck = open_fixture(dir.path());
        let header = deck.add_slide(0).unwrap();
        deck.set_title(header, "Título").unwrap();
        deck.set_placeholder_text(header, 1, &["a".into(), "b".into()])
            .unwrap();

        let content = deck.add_slide(5).unwrap();
        let err = deck
            .set_placeholder_text(content, 1, &["x".into()])
            .unwrap_err();
        assert!(matches!(err, DeckError::MissingPlaceholder { .. }));

        let xml = render_slide(&deck.slides[0]);
        assert!(xml.contains(r#"<p:ph type="ctrTitle"/>"#));
        assert!(xml.contains(r#"<p:ph type="subTitle" idx="1"/>"#));
        assert!(xml.contains("<a:t>Título</a:t>"));
        assert!(xml.contains("<a:t>a</a:t>"));
        assert!(xml.contains("<a:t>b</a:t>"));

        // Slide number placeholders are not cloned onto new slides.
        let xml = render_slide(&deck.slides[1]);
        assert!(!xml.contains("sldNum"));
    }

    #[test]
    fn test_unknown_slide() {
        let dir = tempfile::tempdir().unwrap();
        let mut deck = open_fixture(dir.path());
        let err = deck.set_title(SlideId(3), "x").unwrap_err();
        assert!(matches!(err, DeckError::UnknownSlide(3)));
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut deck = open_fixture(dir.path());

        let header = deck.add_slide(0).unwrap();
        deck.set_title(header, "RELATÓRIO").unwrap();
        let first = deck.add_slide(5).unwrap();
        deck.add_picture(first, picture("a.png", ImageFormat::Png), frame())
            .unwrap();
        deck.add_picture(first, picture("b & c.jpg", ImageFormat::Jpeg), frame())
            .unwrap();
        let second = deck.add_slide(5).unwrap();
        deck.add_picture(second, picture("d.gif", ImageFormat::Gif), frame())
            .unwrap();

        let out = dir.path().join("out.pptx");
        deck.save(&out).unwrap();

        let saved = PptxDeck::open(&out).unwrap();
        assert_eq!(
            saved.slide_pictures().unwrap(),
            vec![
                vec![],
                vec!["a.png".to_string(), "b & c.jpg".to_string()],
                vec!["d.gif".to_string()],
            ]
        );

        let types = saved.part_text(CONTENT_TYPES).unwrap();
        assert!(types.contains(r#"PartName="/ppt/slides/slide3.xml""#));
        assert!(types.contains(r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#));
        assert!(types.contains(r#"<Default Extension="gif" ContentType="image/gif"/>"#));
        // "PNG" is already declared by the template.
        assert!(!types.contains(r#"Extension="png""#));

        let rels = saved.part_text("ppt/slides/_rels/slide2.xml.rels").unwrap();
        assert!(rels.contains(r#"Target="../slideLayouts/slideLayout1.xml""#));
        assert!(rels.contains(r#"Target="../media/image1.png""#));
        assert!(rels.contains(r#"Target="../media/image2.jpeg""#));

        let slide = saved.part_text("ppt/slides/slide2.xml").unwrap();
        assert!(slide.contains(r#"<a:off x="360000" y="720000"/>"#));
        assert!(slide.contains(r#"<a:ext cx="3600000" cy="2700000"/>"#));
    }

    #[test]
    fn test_appends_after_existing_slides() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.pptx");
        fixtures::write_template_with_slide(&template);

        let mut deck = PptxDeck::open(&template).unwrap();
        let slide = deck.add_slide(5).unwrap();
        deck.add_picture(slide, picture("a.png", ImageFormat::Png), frame())
            .unwrap();
        let out = dir.path().join("out.pptx");
        deck.save(&out).unwrap();

        let saved = PptxDeck::open(&out).unwrap();
        assert_eq!(saved.slide_pictures().unwrap().len(), 2);
        let presentation = saved.part_text("ppt/presentation.xml").unwrap();
        assert!(presentation.contains(r#"<p:sldId id="257" r:id="rId3"/>"#));
        assert!(saved.part_text("ppt/slides/slide2.xml").is_ok());
    }

    #[test]
    fn test_save_without_slides_keeps_template() {
        let dir = tempfile::tempdir().unwrap();
        let deck = open_fixture(dir.path());
        let out = dir.path().join("copy.pptx");
        deck.save(&out).unwrap();

        let saved = PptxDeck::open(&out).unwrap();
        assert!(saved.slide_pictures().unwrap().is_empty());
        assert_eq!(saved.layout_count(), fixtures::LAYOUTS);
    }

    #[test]
    fn test_insert_slide_ids_variants() {
        let existing = "<p:sldMasterIdLst></p:sldMasterIdLst><p:sldIdLst><p:sldId/></p:sldIdLst>";
        assert!(insert_slide_ids(existing, "X")
            .unwrap()
            .contains("<p:sldId/>X</p:sldIdLst>"));

        let empty = "<p:sldMasterIdLst></p:sldMasterIdLst><p:sldIdLst/><p:sldSz/>";
        assert_eq!(
            insert_slide_ids(empty, "X").unwrap(),
            "<p:sldMasterIdLst></p:sldMasterIdLst><p:sldIdLst>X</p:sldIdLst><p:sldSz/>"
        );

        let absent = "<p:sldMasterIdLst></p:sldMasterIdLst><p:notesMasterIdLst></p:notesMasterIdLst><p:sldSz/>";
        assert_eq!(
            insert_slide_ids(absent, "X").unwrap(),
            "<p:sldMasterIdLst></p:sldMasterIdLst><p:notesMasterIdLst></p:notesMasterIdLst><p:sldIdLst>X</p:sldIdLst><p:sldSz/>"
        );

        assert!(insert_slide_ids("<p:presentation/>", "X").is_none());
    }
}
