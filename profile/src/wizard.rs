//! Step navigation over a `FormRecord`.

use lancer_store::ProfileRepository;
use serde::Serialize;
use serde_json::Value;

use crate::media::MediaEncoder;
use crate::payload::load_existing;
use crate::record::FormRecord;
use crate::section::{Section, SectionParseError};
use crate::submit::{SubmitError, SubmitOutcome, submit_profile};
use crate::value::SectionFields;

/// One wizard step. Ids run `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardStep {
    pub id: u8,
    pub title: &'static str,
    pub section: Section,
}

/// Six steps, one per section, in section order.
pub fn default_steps() -> Vec<WizardStep> {
    Section::all()
        .into_iter()
        .zip(1u8..)
        .map(|(section, id)| WizardStep {
            id,
            title: section.title(),
            section,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardMode {
    Create,
    Edit,
}

/// What the primary button does on the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    Advance,
    Submit,
}

#[derive(Debug, Clone)]
pub struct ProfileWizard {
    record: FormRecord,
    steps: Vec<WizardStep>,
    /// 1-based; always within `[1, steps.len()]`.
    current: u8,
    mode: WizardMode,
}

impl Default for ProfileWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileWizard {
    /// Fresh wizard with empty defaults.
    pub fn new() -> Self {
        Self {
            record: FormRecord::new(),
            steps: default_steps(),
            current: 1,
            mode: WizardMode::Create,
        }
    }

    /// Edit-mode wizard prefilled from a stored payload.
    pub fn edit(existing: &Value) -> Self {
        Self {
            record: load_existing(existing),
            mode: WizardMode::Edit,
            ..Self::new()
        }
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn total_steps(&self) -> u8 {
        u8::try_from(self.steps.len()).unwrap_or(u8::MAX)
    }

    pub fn current_step_id(&self) -> u8 {
        self.current
    }

    pub fn current_step(&self) -> &WizardStep {
        &self.steps[usize::from(self.current - 1)]
    }

    pub fn is_first_step(&self) -> bool {
        self.current == 1
    }

    pub fn is_last_step(&self) -> bool {
        self.current == self.total_steps()
    }

    pub fn next_action(&self) -> NextAction {
        if self.is_last_step() {
            NextAction::Submit
        } else {
            NextAction::Advance
        }
    }

    /// Advance one step. Returns `false` (no-op) on the last step.
    pub fn go_next(&mut self) -> bool {
        if self.current < self.total_steps() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Go back one step. Returns `false` (no-op) on step 1.
    pub fn go_prev(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn merge_section(&mut self, section: Section, partial: SectionFields) {
        self.record.merge_section(section, partial);
    }

    pub fn merge_section_named(
        &mut self,
        name: &str,
        partial: SectionFields,
    ) -> Result<(), SectionParseError> {
        self.record.merge_section_named(name, partial)
    }

    /// Merge into the section owned by the current step.
    pub fn merge_current(&mut self, partial: SectionFields) {
        let section = self.current_step().section;
        self.merge_section(section, partial);
    }

    /// Submit the record. The wizard is left untouched either way; on
    /// success the caller drops it and follows `redirect`.
    pub async fn submit(
        &self,
        repository: &ProfileRepository,
        encoder: &dyn MediaEncoder,
    ) -> Result<SubmitOutcome, SubmitError> {
        submit_profile(&self.record, repository, encoder).await
    }
}
