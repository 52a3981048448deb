//! Multi-step freelancer profile builder.
//!
//! A `ProfileWizard` owns a `FormRecord` split into six fixed sections.
//! Each step edits one section through shallow merges; the final submit
//! gates on required fields, reshapes the record into the backend
//! `ProfilePayload`, encodes picked files concurrently and persists the
//! result through `lancer_store::ProfileRepository`.
//!
//! Edit mode runs the mapping in reverse (`load_existing`) from whatever
//! payload shape is already stored.

pub mod media;
pub mod payload;
pub mod record;
pub mod section;
pub mod submit;
pub mod value;
pub mod view;
pub mod wizard;

pub use media::{DataUrlEncoder, MediaEncoder, MediaError};
pub use payload::{MediaInput, MediaSlot, PayloadDraft, ProfilePayload, load_existing, transform};
pub use record::FormRecord;
pub use section::{Section, SectionParseError};
pub use submit::{Redirect, RequiredField, SubmitError, SubmitOutcome, submit_profile};
pub use value::{AttachmentSource, FieldValue, FileAttachment, SectionFields, fields};
pub use view::{PublicProfile, completeness};
pub use wizard::{NextAction, ProfileWizard, WizardMode, WizardStep};
