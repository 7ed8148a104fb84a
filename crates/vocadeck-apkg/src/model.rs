//! Anki note model built from inferred note templates.

use std::collections::BTreeSet;

use serde_json::{json, Value};
use vocadeck_core::{NoteTemplate, Region, SlotKey};

use crate::ids::id_for_name;

/// Question and answer format of one card type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFormat {
    pub name: String,
    pub qfmt: String,
    pub afmt: String,
    /// Field indices shown on the front.
    pub front_fields: Vec<usize>,
}

/// One Anki model covering every template of a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteModel {
    pub id: i64,
    pub name: String,
    /// Fields in emitted order.
    pub fields: Vec<SlotKey>,
    pub formats: Vec<CardFormat>,
    pub css: String,
}

impl NoteModel {
    /// Build the model for `deck_name`.
    ///
    /// Fields are the distinct slot keys of all templates, ordered by role
    /// then content kind. Card formats follow template order, so a card's
    /// ordinal is its template's position.
    pub fn from_templates(deck_name: &str, templates: &[NoteTemplate], css: &str) -> Self {
        let fields: Vec<SlotKey> = templates
            .iter()
            .flat_map(|t| t.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let formats = templates
            .iter()
            .map(|template| CardFormat::new(template, &fields))
            .collect();

        Self {
            id: id_for_name(deck_name),
            name: deck_name.to_string(),
            fields,
            formats,
            css: css.to_string(),
        }
    }

    /// Position of a slot key among the fields.
    pub fn field_index(&self, key: SlotKey) -> Option<usize> {
        self.fields.iter().position(|k| *k == key)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(SlotKey::field_name).collect()
    }

    /// Model entry for the collection's `models` JSON.
    pub fn to_json(&self, deck_id: i64, modified: i64) -> Value {
        let flds: Vec<Value> = self
            .field_names()
            .into_iter()
            .enumerate()
            .map(|(ord, name)| {
                json!({
                    "name": name,
                    "ord": ord,
                    "sticky": false,
                    "rtl": false,
                    "font": "Arial",
                    "size": 20,
                    "media": [],
                })
            })
            .collect();

        let tmpls: Vec<Value> = self
            .formats
            .iter()
            .enumerate()
            .map(|(ord, format)| {
                json!({
                    "name": format.name,
                    "ord": ord,
                    "qfmt": format.qfmt,
                    "afmt": format.afmt,
                    "bqfmt": "",
                    "bafmt": "",
                    "did": null,
                    "bfont": "",
                    "bsize": 0,
                })
            })
            .collect();

        let req: Vec<Value> = self
            .formats
            .iter()
            .enumerate()
            .map(|(ord, format)| json!([ord, "any", format.front_fields]))
            .collect();

        json!({
            "id": self.id,
            "name": self.name,
            "type": 0,
            "mod": modified,
            "usn": -1,
            "sortf": 0,
            "did": deck_id,
            "tmpls": tmpls,
            "flds": flds,
            "css": self.css,
            "latexPre": "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n",
            "latexPost": "\\end{document}",
            "latexsvg": false,
            "req": req,
            "tags": [],
            "vers": [],
        })
    }
}

impl CardFormat {
    fn new(template: &NoteTemplate, fields: &[SlotKey]) -> Self {
        let refs = |region: Region| -> Vec<String> {
            template
                .slots_in(region)
                .map(|s| format!("{{{{{}}}}}", s.key().field_name()))
                .collect()
        };

        let front = refs(Region::Front);
        let back = refs(Region::Back);
        let extra = refs(Region::Extra);

        let mut afmt = format!("{{{{FrontSide}}}}<hr id=answer>{}", back.join("<br>"));
        if !extra.is_empty() {
            afmt.push_str("<hr>");
            afmt.push_str(&extra.join("<br>"));
        }

        let front_fields = template
            .slots_in(Region::Front)
            .filter_map(|s| fields.iter().position(|k| *k == s.key()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            name: template.name.clone(),
            qfmt: front.join("<br>"),
            afmt,
            front_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocadeck_core::{ContentKind, FieldRole, Slot};

    fn listen_with_reverse() -> Vec<NoteTemplate> {
        let base = NoteTemplate::new(
            "Listen",
            vec![
                Slot::new(Region::Front, ContentKind::Audio, FieldRole::Term),
                Slot::new(Region::Back, ContentKind::Text, FieldRole::Term),
                Slot::new(Region::Back, ContentKind::Text, FieldRole::Translation),
                Slot::new(Region::Extra, ContentKind::Image, FieldRole::Term),
            ],
        );
        let reversed = base.reversed("Listen (reversed)");
        vec![base, reversed]
    }

    #[test]
    fn fields_ordered_by_role_then_content() {
        let model = NoteModel::from_templates("French", &listen_with_reverse(), "");
        assert_eq!(
            model.field_names(),
            vec!["Vocab", "Sound", "Image", "Translation"]
        );
    }

    #[test]
    fn formats_follow_regions() {
        let model = NoteModel::from_templates("French", &listen_with_reverse(), "");
        let listen = &model.formats[0];
        assert_eq!(listen.qfmt, "{{Sound}}");
        assert_eq!(
            listen.afmt,
            "{{FrontSide}}<hr id=answer>{{Vocab}}<br>{{Translation}}<hr>{{Image}}"
        );
        assert_eq!(listen.front_fields, vec![1]);

        let reversed = &model.formats[1];
        assert_eq!(reversed.qfmt, "{{Vocab}}<br>{{Translation}}");
        assert_eq!(reversed.front_fields, vec![0, 3]);
    }

    #[test]
    fn json_has_req_and_fields() {
        let model = NoteModel::from_templates("French", &listen_with_reverse(), "");
        let json = model.to_json(42, 1_700_000_000);
        assert_eq!(json["did"], 42);
        assert_eq!(json["flds"].as_array().unwrap().len(), 4);
        assert_eq!(json["req"][0], json!([0, "any", [1]]));
        assert_eq!(json["tmpls"][1]["name"], "Listen (reversed)");
    }
}
