//! Capabilities most kinds share.

use chrono::{DateTime, Utc};

use crate::model::vocab::{enola, rdf, schema, xsd};
use crate::model::Link;

capability! {
    /// `rdf:type`; every registered kind includes it.
    pub const HAS_TYPE: HasType, HasTypeBuilder {
        types, add_type_link: Many Link => rdf::TYPE, None;
    }
}

capability! {
    pub const HAS_LABEL: HasLabel, HasLabelBuilder {
        label, set_label: One String => enola::LABEL, None;
    }
}

capability! {
    pub const HAS_DESCRIPTION: HasDescription, HasDescriptionBuilder {
        description, set_description: One String => enola::DESCRIPTION, None;
    }
}

capability! {
    pub const HAS_EMOJI: HasEmoji, HasEmojiBuilder {
        emoji, set_emoji: One String => enola::EMOJI, None;
    }
}

capability! {
    /// Creation and modification timestamps.
    pub const HAS_CREATED: HasCreated, HasCreatedBuilder {
        created, set_created: One DateTime<Utc> => schema::DATE_CREATED, Some(xsd::DATE_TIME);
        modified, set_modified: One DateTime<Utc> => schema::DATE_MODIFIED, Some(xsd::DATE_TIME);
    }
}

capability! {
    /// Other IRIs naming the same Thing.
    pub const HAS_SAME_AS: HasSameAs, HasSameAsBuilder {
        same_as, add_same_as: Many Link => schema::SAME_AS, Some(xsd::ANY_URI);
    }
}
