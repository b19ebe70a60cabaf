use crate::models::{NormalizedPerson, NO_PREFERENCE};

/// Check whether one person's roommate preference accepts the other's gender
#[inline]
pub fn accepts_gender(preferred_gender: &str, other_gender: &str) -> bool {
    preferred_gender == NO_PREFERENCE || preferred_gender == other_gender
}

/// Hard gender-preference gate
///
/// Both directions must hold; a pair failing the gate scores 0 no matter how
/// well the other factors line up.
#[inline]
pub fn is_gender_compatible(a: &NormalizedPerson, b: &NormalizedPerson) -> bool {
    accepts_gender(&a.preferred_gender, &b.gender) && accepts_gender(&b.preferred_gender, &a.gender)
}
