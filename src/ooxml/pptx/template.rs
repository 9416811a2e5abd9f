//! Built-in default presentation.
//!
//! One 16:9 master with a title and a body placeholder, three layouts
//! ("Title Slide", "Title and Content", "Title Only"), a plain theme and the
//! document property parts, assembled into an [`OpcPackage`] with no slides.

use crate::ooxml::error::Result;
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::{Part, XmlPart};
use std::fmt::Write as FmtWrite;

const NS_DECLS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

/// Slide width in EMU (13.333 in).
pub const SLIDE_WIDTH: i64 = 12_192_000;
/// Slide height in EMU (7.5 in).
pub const SLIDE_HEIGHT: i64 = 6_858_000;

pub const LAYOUT_TITLE_SLIDE: &str = "Title Slide";
pub const LAYOUT_TITLE_AND_CONTENT: &str = "Title and Content";
pub const LAYOUT_TITLE_ONLY: &str = "Title Only";

pub(crate) const SP_TREE_HEAD: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

/// Placeholder shape for master and layout trees.
fn placeholder_sp(
    id: u32,
    name: &str,
    ph_attrs: &str,
    xfrm: Option<(i64, i64, i64, i64)>,
    body_pr: &str,
    prompt: &str,
) -> String {
    let mut xml = String::with_capacity(512);
    let _ = write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph {}/></p:nvPr></p:nvSpPr>"#,
        id, name, ph_attrs
    );
    match xfrm {
        Some((x, y, cx, cy)) => {
            let _ = write!(
                xml,
                r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#,
                x, y, cx, cy
            );
        },
        None => xml.push_str("<p:spPr/>"),
    }
    let _ = write!(
        xml,
        r#"<p:txBody>{}<a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        body_pr, prompt
    );
    xml
}

/// `presentation.xml` with a single master relationship and no slides.
pub fn presentation_xml(master_r_id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="{}"/></p:sldMasterIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/><p:defaultTextStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr></p:defaultTextStyle></p:presentation>"#,
        NS_DECLS, master_r_id, SLIDE_WIDTH, SLIDE_HEIGHT
    )
}

/// Slide master; `layout_r_ids` lists its layout relationships in order.
pub fn slide_master_xml(layout_r_ids: &[String]) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    let _ = write!(xml, "<p:sldMaster {}>", NS_DECLS);
    xml.push_str(r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>"#);
    xml.push_str(SP_TREE_HEAD);
    xml.push_str(&placeholder_sp(
        2,
        "Title Placeholder 1",
        r#"type="title""#,
        Some((838_200, 365_125, 10_515_600, 1_325_563)),
        r#"<a:bodyPr vert="horz" lIns="91440" tIns="45720" rIns="91440" bIns="45720" rtlCol="0" anchor="ctr"><a:normAutofit/></a:bodyPr>"#,
        "Click to edit Master title style",
    ));
    xml.push_str(&placeholder_sp(
        3,
        "Text Placeholder 2",
        r#"type="body" idx="1""#,
        Some((838_200, 1_825_625, 10_515_600, 4_351_338)),
        r#"<a:bodyPr vert="horz" lIns="91440" tIns="45720" rIns="91440" bIns="45720" rtlCol="0"><a:normAutofit/></a:bodyPr>"#,
        "Click to edit Master text styles",
    ));
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#);
    xml.push_str("<p:sldLayoutIdLst>");
    for (i, r_id) in layout_r_ids.iter().enumerate() {
        let _ = write!(
            xml,
            r#"<p:sldLayoutId id="{}" r:id="{}"/>"#,
            2_147_483_649u32 + i as u32,
            r_id
        );
    }
    xml.push_str("</p:sldLayoutIdLst>");
    xml.push_str(concat!(
        "<p:txStyles>",
        r#"<p:titleStyle><a:lvl1pPr algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:lnSpc><a:spcPct val="90000"/></a:lnSpc><a:spcBef><a:spcPct val="0"/></a:spcBef><a:buNone/><a:defRPr sz="4400" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr></a:lvl1pPr></p:titleStyle>"#,
        r#"<p:bodyStyle><a:lvl1pPr marL="228600" indent="-228600" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:lnSpc><a:spcPct val="90000"/></a:lnSpc><a:spcBef><a:spcPts val="1000"/></a:spcBef><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/><a:defRPr sz="2800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr>"#,
        r#"<a:lvl2pPr marL="685800" indent="-228600" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:lnSpc><a:spcPct val="90000"/></a:lnSpc><a:spcBef><a:spcPts val="500"/></a:spcBef><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/><a:defRPr sz="2400" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl2pPr></p:bodyStyle>"#,
        r#"<p:otherStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr><a:lvl1pPr marL="0" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:defRPr sz="1800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr></p:otherStyle>"#,
        "</p:txStyles>",
    ));
    xml.push_str("</p:sldMaster>");
    xml
}

fn slide_layout_xml(name: &str, kind: &str, shapes: &[String]) -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    let _ = write!(
        xml,
        r#"<p:sldLayout {} type="{}" preserve="1"><p:cSld name="{}"><p:spTree>"#,
        NS_DECLS, kind, name
    );
    xml.push_str(SP_TREE_HEAD);
    for shape in shapes {
        xml.push_str(shape);
    }
    xml.push_str("</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>");
    xml
}

/// "Title Slide": centered title and subtitle.
pub fn title_slide_layout_xml() -> String {
    slide_layout_xml(
        LAYOUT_TITLE_SLIDE,
        "title",
        &[
            placeholder_sp(
                2,
                "Title 1",
                r#"type="ctrTitle""#,
                Some((1_524_000, 1_122_363, 9_144_000, 2_387_600)),
                r#"<a:bodyPr anchor="b"/>"#,
                "Click to edit Master title style",
            ),
            placeholder_sp(
                3,
                "Subtitle 2",
                r#"type="subTitle" idx="1""#,
                Some((1_524_000, 3_602_038, 9_144_000, 1_655_762)),
                "<a:bodyPr/>",
                "Click to edit Master subtitle style",
            ),
        ],
    )
}

/// "Title and Content": title plus a content placeholder, both at master positions.
pub fn title_and_content_layout_xml() -> String {
    slide_layout_xml(
        LAYOUT_TITLE_AND_CONTENT,
        "obj",
        &[
            placeholder_sp(2, "Title 1", r#"type="title""#, None, "<a:bodyPr/>", "Click to edit Master title style"),
            placeholder_sp(3, "Content Placeholder 2", r#"idx="1""#, None, "<a:bodyPr/>", "Click to edit Master text styles"),
        ],
    )
}

/// "Title Only".
pub fn title_only_layout_xml() -> String {
    slide_layout_xml(
        LAYOUT_TITLE_ONLY,
        "titleOnly",
        &[placeholder_sp(2, "Title 1", r#"type="title""#, None, "<a:bodyPr/>", "Click to edit Master title style")],
    )
}

/// A plain theme with the Office color and font schemes.
pub fn theme_xml() -> String {
    let colors = [
        ("dk2", "44546A"),
        ("lt2", "E7E6E6"),
        ("accent1", "4472C4"),
        ("accent2", "ED7D31"),
        ("accent3", "A5A5A5"),
        ("accent4", "FFC000"),
        ("accent5", "5B9BD5"),
        ("accent6", "70AD47"),
        ("hlink", "0563C1"),
        ("folHlink", "954F72"),
    ];
    let ph_fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;

    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements>"#);
    xml.push_str(r#"<a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    for (name, rgb) in colors {
        let _ = write!(xml, r#"<a:{0}><a:srgbClr val="{1}"/></a:{0}>"#, name, rgb);
    }
    xml.push_str("</a:clrScheme>");
    xml.push_str(r#"<a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme>"#);
    xml.push_str(r#"<a:fmtScheme name="Office"><a:fillStyleLst>"#);
    xml.push_str(&ph_fill.repeat(3));
    xml.push_str("</a:fillStyleLst><a:lnStyleLst>");
    for width in [6350, 12700, 19050] {
        let _ = write!(xml, r#"<a:ln w="{}" cap="flat" cmpd="sng" algn="ctr">{}<a:prstDash val="solid"/><a:miter lim="800000"/></a:ln>"#, width, ph_fill);
    }
    xml.push_str("</a:lnStyleLst><a:effectStyleLst>");
    xml.push_str(&"<a:effectStyle><a:effectLst/></a:effectStyle>".repeat(3));
    xml.push_str("</a:effectStyleLst><a:bgFillStyleLst>");
    xml.push_str(&ph_fill.repeat(3));
    xml.push_str("</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>");
    xml
}

fn pres_props_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentationPr {}/>"#,
        NS_DECLS
    )
}

fn view_props_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:viewPr {}><p:normalViewPr><p:restoredLeft sz="15620"/><p:restoredTop sz="94660"/></p:normalViewPr><p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#,
        NS_DECLS
    )
}

fn table_styles_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" def="{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"/>"#
}

fn core_props_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>Presentation</dc:title><dc:creator>longan</dc:creator><cp:revision>1</cp:revision></cp:coreProperties>"#
}

fn app_props_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>longan</Application><PresentationFormat>Widescreen</PresentationFormat></Properties>"#
}

fn xml_part(partname: &str, content_type: &str, xml: String) -> Result<Box<dyn Part>> {
    Ok(Box::new(XmlPart::new(
        PackURI::new(partname)?,
        content_type.to_string(),
        xml.into_bytes(),
    )))
}

/// Assemble the default presentation package.
pub fn default_package() -> Result<OpcPackage> {
    let mut pkg = OpcPackage::new();

    let pres = PackURI::new("/ppt/presentation.xml")?;
    let master = PackURI::new("/ppt/slideMasters/slideMaster1.xml")?;
    let theme = PackURI::new("/ppt/theme/theme1.xml")?;
    let layouts = [
        (PackURI::new("/ppt/slideLayouts/slideLayout1.xml")?, title_slide_layout_xml()),
        (PackURI::new("/ppt/slideLayouts/slideLayout2.xml")?, title_and_content_layout_xml()),
        (PackURI::new("/ppt/slideLayouts/slideLayout3.xml")?, title_only_layout_xml()),
    ];

    // Layouts relate back to the master
    let mut layout_r_ids = Vec::with_capacity(layouts.len());
    let mut master_rels = crate::ooxml::opc::rel::Relationships::new(master.base_uri().to_string());
    for (partname, xml) in layouts {
        let mut part = xml_part(partname.as_str(), ct::PML_SLIDE_LAYOUT, xml)?;
        part.relate_to(&master, rt::SLIDE_MASTER);
        layout_r_ids.push(master_rels.get_or_add(rt::SLIDE_LAYOUT, &partname));
        pkg.add_part(part);
    }
    master_rels.get_or_add(rt::THEME, &theme);

    let mut master_part = xml_part(master.as_str(), ct::PML_SLIDE_MASTER, slide_master_xml(&layout_r_ids))?;
    *master_part.rels_mut() = master_rels;
    pkg.add_part(master_part);
    pkg.add_part(xml_part(theme.as_str(), ct::OFC_THEME, theme_xml())?);

    let mut pres_part = xml_part(pres.as_str(), ct::PML_PRESENTATION_MAIN, String::new())?;
    let master_r_id = pres_part.relate_to(&master, rt::SLIDE_MASTER);
    pres_part.set_blob(presentation_xml(&master_r_id).into_bytes());
    for (partname, content_type, reltype, xml) in [
        ("/ppt/presProps.xml", ct::PML_PRES_PROPS, rt::PRES_PROPS, pres_props_xml()),
        ("/ppt/viewProps.xml", ct::PML_VIEW_PROPS, rt::VIEW_PROPS, view_props_xml()),
        ("/ppt/tableStyles.xml", ct::PML_TABLE_STYLES, rt::TABLE_STYLES, table_styles_xml().to_string()),
    ] {
        let part = xml_part(partname, content_type, xml)?;
        pres_part.relate_to(part.partname(), reltype);
        pkg.add_part(part);
    }
    pres_part.relate_to(&theme, rt::THEME);
    pkg.add_part(pres_part);

    let core = xml_part("/docProps/core.xml", ct::OPC_CORE_PROPERTIES, core_props_xml().to_string())?;
    let app = xml_part("/docProps/app.xml", ct::OFC_EXTENDED_PROPERTIES, app_props_xml().to_string())?;
    pkg.relate_to(&pres, rt::OFFICE_DOCUMENT);
    pkg.relate_to(core.partname(), rt::CORE_PROPERTIES);
    pkg.relate_to(app.partname(), rt::EXTENDED_PROPERTIES);
    pkg.add_part(core);
    pkg.add_part(app);

    Ok(pkg)
}
