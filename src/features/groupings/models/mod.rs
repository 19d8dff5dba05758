mod grouping;

pub use grouping::{EstablishmentVisit, GroupedEstablishment, Grouping};
