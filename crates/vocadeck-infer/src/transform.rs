//! Per-tag transformations applied to a draft template.

use vocadeck_core::{ColumnTag, ContentKind, FieldRole, NoteTemplate, Region, Slot};

/// Template under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub template: NoteTemplate,
    /// Q&A semantics are active: prompt and answer roles replace term and
    /// translation.
    pub question_answer: bool,
    /// A reversed sibling is requested.
    pub reverse: bool,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            template: NoteTemplate::new(
                "Vocab",
                vec![
                    Slot::new(Region::Front, ContentKind::Text, FieldRole::Term),
                    Slot::new(Region::Back, ContentKind::Text, FieldRole::Translation),
                ],
            ),
            question_answer: false,
            reverse: false,
        }
    }
}

impl Draft {
    /// Role reading the first column.
    pub fn prompt(&self) -> FieldRole {
        if self.question_answer {
            FieldRole::Question
        } else {
            FieldRole::Term
        }
    }

    /// Insert `slot` right after the last slot matching `after`, or at the
    /// end of its region when nothing matches.
    fn insert_after(&mut self, slot: Slot, after: impl Fn(&Slot) -> bool) {
        let slots = &mut self.template.slots;
        let position = slots
            .iter()
            .rposition(|s| after(s))
            .or_else(|| slots.iter().rposition(|s| s.region <= slot.region))
            .map(|i| i + 1)
            .unwrap_or(0);
        slots.insert(position, slot);
    }

    /// Append `slot` at the end of its region.
    fn append(&mut self, slot: Slot) {
        let region = slot.region;
        self.insert_after(slot, |s| s.region == region);
    }

    fn contains(&self, slot: Slot) -> bool {
        self.template.slots.contains(&slot)
    }
}

/// The additive change one column tag makes to a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Front becomes a question, back its answer.
    QuestionAnswer,
    /// Audio of the prompt on the front; of the answer too under Q&A.
    Sound,
    /// Front holds only audio; everything else moves to the back.
    Listen,
    /// Transcription of the prompt (and answer under Q&A) on the back.
    Phonetics,
    /// Picture of the prompt in the extra region.
    Image,
    /// Remark text in the extra region.
    Remark,
    /// Request a reversed sibling template.
    Reverse,
}

impl Transform {
    pub fn apply(self, draft: &mut Draft) {
        match self {
            Self::QuestionAnswer => {
                draft.question_answer = true;
                draft.template = NoteTemplate::new(
                    "Q&A",
                    vec![
                        Slot::new(Region::Front, ContentKind::Text, FieldRole::Question),
                        Slot::new(Region::Back, ContentKind::Text, FieldRole::Answer),
                    ],
                );
            }
            Self::Sound => {
                let prompt = draft.prompt();
                draft.insert_after(
                    Slot::new(Region::Front, ContentKind::Audio, prompt),
                    |s| s.region == Region::Front && s.content == ContentKind::Text,
                );
                if draft.question_answer {
                    draft.insert_after(
                        Slot::new(Region::Back, ContentKind::Audio, FieldRole::Answer),
                        |s| {
                            s.region == Region::Back
                                && s.content == ContentKind::Text
                                && s.role == FieldRole::Answer
                        },
                    );
                }
            }
            Self::Listen => {
                let prompt = draft.prompt();
                let audio = Slot::new(Region::Front, ContentKind::Audio, prompt);
                let slots = std::mem::take(&mut draft.template.slots);
                let (front, rest): (Vec<Slot>, Vec<Slot>) =
                    slots.into_iter().partition(|s| s.region == Region::Front);
                let (front_audio, moved): (Vec<Slot>, Vec<Slot>) =
                    front.into_iter().partition(|s| s.content == ContentKind::Audio);

                let mut reordered = if front_audio.is_empty() {
                    vec![audio]
                } else {
                    front_audio
                };
                reordered.extend(moved.into_iter().map(|s| Slot {
                    region: Region::Back,
                    ..s
                }));
                reordered.extend(rest);

                draft.template.slots = reordered;
                draft.template.name = "Listen".to_string();
            }
            Self::Phonetics => {
                let prompt = draft.prompt();
                draft.append(Slot::new(Region::Back, ContentKind::Phonetics, prompt));
                if draft.question_answer {
                    draft.append(Slot::new(
                        Region::Back,
                        ContentKind::Phonetics,
                        FieldRole::Answer,
                    ));
                }
            }
            Self::Image => {
                let slot = Slot::new(Region::Extra, ContentKind::Image, draft.prompt());
                if !draft.contains(slot) {
                    draft.append(slot);
                }
            }
            Self::Remark => {
                draft.append(Slot::new(Region::Extra, ContentKind::Text, FieldRole::Remark));
            }
            Self::Reverse => draft.reverse = true,
        }
    }
}

/// A column tag bound to its transform and priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformRule {
    pub tag: ColumnTag,
    /// Higher priorities are applied first.
    pub priority: i32,
    pub transform: Transform,
}

/// The built-in rule catalog.
///
/// `Vocab` and `Translation` have no rule: they only make up the base
/// template.
pub fn catalog() -> Vec<TransformRule> {
    let rule = |tag, priority, transform| TransformRule {
        tag,
        priority,
        transform,
    };
    vec![
        rule(ColumnTag::QAndA, 100, Transform::QuestionAnswer),
        rule(ColumnTag::Sound, 80, Transform::Sound),
        rule(ColumnTag::Listen, 70, Transform::Listen),
        rule(ColumnTag::Phonetics, 60, Transform::Phonetics),
        rule(ColumnTag::Image, 50, Transform::Image),
        rule(ColumnTag::Remark, 40, Transform::Remark),
        rule(ColumnTag::Reverse, 10, Transform::Reverse),
    ]
}
