//! IRIs of the few vocabulary terms the renderer treats specially.

pub mod rdf {
    //! [RDF](https://www.w3.org/TR/rdf11-concepts/) vocabulary.

    /// The subject is an instance of a class.
    ///
    /// Written `a` in predicate position.
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

pub mod xsd {
    //! [RDF compatible XSD datatypes](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-compatible-xsd-types).

    /// true, false.
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// Dates (yyyy-mm-dd) with or without timezone.
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    /// Arbitrary-size integer numbers.
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// Character strings.
    ///
    /// Literals with this datatype are simple literals.
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
}
