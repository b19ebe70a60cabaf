// Unit tests for Roommate Match

use roommate_match::core::{
    filters::is_gender_compatible,
    normalize::{normalize_records, CategoricalVocabulary, ColumnRange},
    scoring::{calculate_match_score, overlap_score, ratio_score, score_breakdown},
};
use roommate_match::models::{Cell, EncodedValue, NormalizedPerson, PersonRecord, NO_PREFERENCE};

fn create_person(name: &str, gender: &str, preferred_gender: &str) -> PersonRecord {
    PersonRecord {
        name: name.into(),
        gender: gender.into(),
        preferred_gender: preferred_gender.into(),
        age: 24.0.into(),
        budget: 300.0.into(),
        smoking: "Non-smoker".into(),
        lifestyle: "Social".into(),
        living_habits: "Clean".into(),
        pets: "No Pets".into(),
        location: "Fitzroy".into(),
        living_arrangement: "Private Room".into(),
        hobbies: "Reading,Gaming".into(),
        sports: "Soccer,Tennis".into(),
    }
}

fn normalize_pair(a: PersonRecord, b: PersonRecord) -> (NormalizedPerson, NormalizedPerson) {
    let mut people = normalize_records(&[a, b]).unwrap().people.into_iter();
    let first = people.next().unwrap();
    let second = people.next().unwrap();
    (first, second)
}

#[test]
fn test_identical_records_score_exactly_one() {
    let (a, b) = normalize_pair(
        create_person("Ava", "Female", NO_PREFERENCE),
        create_person("Bea", "Female", "Female"),
    );

    assert_eq!(calculate_match_score(&a, &b), 1.0);
}

#[test]
fn test_female_preference_against_male_scores_zero() {
    let (a, b) = normalize_pair(
        create_person("Ava", "Female", "Female"),
        create_person("Cal", "Male", NO_PREFERENCE),
    );

    assert!(!is_gender_compatible(&a, &b));
    assert_eq!(calculate_match_score(&a, &b), 0.0);
    assert_eq!(calculate_match_score(&b, &a), 0.0);
}

#[test]
fn test_missing_preference_means_no_preference() {
    let mut cal = create_person("Cal", "Male", NO_PREFERENCE);
    cal.preferred_gender = Cell::Missing;
    let (a, b) = normalize_pair(create_person("Ava", "Female", NO_PREFERENCE), cal);

    assert_eq!(b.preferred_gender, NO_PREFERENCE);
    assert!(is_gender_compatible(&a, &b));
}

#[test]
fn test_hobbies_overlap_example() {
    assert_eq!(overlap_score("Reading,Gaming", "Gaming,Hiking"), 0.5);
}

#[test]
fn test_hobbies_sub_score_through_pipeline() {
    let mut bea = create_person("Bea", "Female", NO_PREFERENCE);
    bea.hobbies = "Gaming,Hiking".into();
    let (a, b) = normalize_pair(create_person("Ava", "Female", NO_PREFERENCE), bea);

    let factors = score_breakdown(&a, &b).unwrap();
    assert_eq!(factors.hobbies, 0.5);
    assert_eq!(factors.sports, 1.0);
}

#[test]
fn test_missing_hobbies_become_empty_string() {
    let mut ava = create_person("Ava", "Female", NO_PREFERENCE);
    ava.hobbies = Cell::Missing;
    let (a, b) = normalize_pair(ava, create_person("Bea", "Female", NO_PREFERENCE));

    assert_eq!(a.hobbies, "");
    assert_eq!(score_breakdown(&a, &b).unwrap().hobbies, 0.0);
}

#[test]
fn test_missing_categorical_value_is_encoded_like_any_other() {
    let mut ava = create_person("Ava", "Female", NO_PREFERENCE);
    let mut bea = create_person("Bea", "Female", NO_PREFERENCE);
    ava.pets = Cell::Missing;
    bea.pets = NO_PREFERENCE.into();
    let (a, b) = normalize_pair(ava, bea);

    assert_eq!(a.pets, b.pets);
}

#[test]
fn test_budget_uses_raw_values() {
    let mut bea = create_person("Bea", "Female", NO_PREFERENCE);
    bea.budget = 600.0.into();
    let (a, b) = normalize_pair(create_person("Ava", "Female", NO_PREFERENCE), bea);

    assert_eq!(a.budget, EncodedValue::Scaled(0.0));
    assert_eq!(b.budget, EncodedValue::Scaled(1.0));
    assert_eq!(score_breakdown(&a, &b).unwrap().budget, 0.5);
}

#[test]
fn test_ratio_score_is_symmetric() {
    for (x, y) in [(18.0, 30.0), (250.0, 260.0), (0.0, 0.0)] {
        assert_eq!(ratio_score(Some(x), Some(y)), ratio_score(Some(y), Some(x)));
    }
}

#[test]
fn test_vocabulary_is_per_dataset() {
    let first = CategoricalVocabulary::fit(["Carlton", "Fitzroy"]);
    let second = CategoricalVocabulary::fit(["Fitzroy", "Brunswick", "Abbotsford", "Fitzroy"]);

    assert_eq!(first.code("Fitzroy"), Some(1));
    assert_eq!(second.code("Fitzroy"), Some(2));
    assert_eq!(second.code("Carlton"), None);
    assert_eq!(second.values(), ["Abbotsford", "Brunswick", "Fitzroy"]);

    for vocab in [&first, &second] {
        for (idx, value) in vocab.values().iter().enumerate() {
            assert_eq!(vocab.code(value), Some(idx as u32));
        }
    }
}

#[test]
fn test_column_range_bounds() {
    let range = ColumnRange::fit(&[18.0, 21.0, 45.0]).unwrap();

    assert_eq!(range.min, 18.0);
    assert_eq!(range.max, 45.0);
    assert!((0.0..=1.0).contains(&range.scale(21.0)));
}
