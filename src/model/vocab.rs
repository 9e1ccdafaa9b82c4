//! Well-known predicate, class and datatype IRIs.

pub mod rdf {
    /// Links a Thing to the classes ("kinds") it is an instance of.
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
    pub const JSON: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON";
}

pub mod rdfs {
    pub const CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
}

pub mod xsd {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    pub const UNSIGNED_INT: &str = "http://www.w3.org/2001/XMLSchema#unsignedInt";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
}

pub mod schema {
    pub const NAME: &str = "https://schema.org/name";
    pub const DESCRIPTION: &str = "https://schema.org/description";
    pub const URL: &str = "https://schema.org/url";
    pub const SAME_AS: &str = "https://schema.org/sameAs";
    pub const DATE_CREATED: &str = "https://schema.org/dateCreated";
    pub const DATE_MODIFIED: &str = "https://schema.org/dateModified";
}

pub mod enola {
    pub const LABEL: &str = "https://enola.dev/label";
    pub const DESCRIPTION: &str = "https://enola.dev/description";
    pub const EMOJI: &str = "https://enola.dev/emoji";
    pub const MEDIA_TYPE: &str = "https://enola.dev/mediaType";
    pub const ORIGIN: &str = "https://enola.dev/origin";
    pub const UNSIGNED_LONG: &str = "https://enola.dev/UnsignedLong";
}
