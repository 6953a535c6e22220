//! Zone location: header, body, back matter and bibliography list.

use crate::tree::Element;

/// The structural regions of a TEI document, each optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zones<'a> {
    /// `teiHeader`
    pub header: Option<&'a Element>,
    /// `text/body`
    pub body: Option<&'a Element>,
    /// `text/back`
    pub back: Option<&'a Element>,
    /// `listBibl` holding the bibliography
    pub bibliography: Option<&'a Element>,
}

impl<'a> Zones<'a> {
    /// Locate zones under a `TEI` element by role.
    pub fn locate(tei: &'a Element) -> Self {
        let header = tei.child("teiHeader").or_else(|| tei.find("teiHeader"));
        let text = tei.child("text");

        let body = text
            .and_then(|t| t.child("body"))
            .or_else(|| tei.find("body"));
        let back = text
            .and_then(|t| t.child("back"))
            .or_else(|| tei.find("back"));

        // The bibliography normally sits in back matter; some producers put
        // it elsewhere under text.
        let bibliography = back
            .and_then(|b| b.find("listBibl"))
            .or_else(|| text.and_then(|t| t.find("listBibl")));

        let zones = Self {
            header,
            body,
            back,
            bibliography,
        };
        zones.log_gaps();
        zones
    }

    fn log_gaps(&self) {
        if self.header.is_none() {
            log::debug!("No teiHeader zone found");
        }
        if self.body.is_none() {
            log::debug!("No body zone found");
        }
        if self.back.is_none() {
            log::debug!("No back zone found");
        }
        if self.bibliography.is_none() {
            log::debug!("No listBibl zone found");
        }
    }
}
