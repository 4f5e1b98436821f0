use super::*;

fn violations(xml: &str) -> Vec<Violation> {
    match validate(xml) {
        Err(ComicInfoError::SchemaValidation(v)) => v,
        other => panic!("expected schema violations, got {other:?}"),
    }
}

#[test]
fn test_minimal_document_is_valid() {
    validate("<ComicInfo/>").unwrap();
    validate("<?xml version=\"1.0\"?><ComicInfo><Title>Amarillo</Title></ComicInfo>").unwrap();
}

#[test]
fn test_wrong_root() {
    let v = violations("<ComicBook><Title>x</Title></ComicBook>");
    assert_eq!(v.len(), 1);
    assert_eq!(v[0].path, "ComicBook");
}

#[test]
fn test_second_root_element() {
    let v = violations("<ComicInfo><Title>a</Title></ComicInfo><ComicInfo/>");
    assert_eq!(v.len(), 1);
    assert_eq!(v[0].path, "ComicInfo");
    assert_eq!(v[0].message, "content after the root element");
}

#[test]
fn test_unknown_element() {
    let v = violations("<ComicInfo><Isbn>123</Isbn></ComicInfo>");
    assert_eq!(v[0].path, "ComicInfo/Isbn");
    assert_eq!(v[0].message, "unexpected element");
}

#[test]
fn test_element_order() {
    let v = violations("<ComicInfo><Series>Blacksad</Series><Title>Amarillo</Title></ComicInfo>");
    assert_eq!(v.len(), 1);
    assert_eq!(v[0].path, "ComicInfo/Title");
}

#[test]
fn test_duplicate_element() {
    let v = violations("<ComicInfo><Title>a</Title><Title>b</Title></ComicInfo>");
    assert_eq!(v[0].message, "element appears more than once");
}

#[test]
fn test_empty_int_is_rejected() {
    let v = violations("<ComicInfo><Year></Year></ComicInfo>");
    assert_eq!(v[0].path, "ComicInfo/Year");

    let v = violations("<ComicInfo><Year/></ComicInfo>");
    assert_eq!(v[0].path, "ComicInfo/Year");
}

#[test]
fn test_int_ranges() {
    validate("<ComicInfo><Month>-1</Month><Day>31</Day></ComicInfo>").unwrap();
    let v = violations("<ComicInfo><Month>13</Month><Day>0</Day></ComicInfo>");
    assert_eq!(v.len(), 1);
    assert_eq!(v[0].path, "ComicInfo/Month");
}

#[test]
fn test_enum_values() {
    validate("<ComicInfo><Manga>YesAndRightToLeft</Manga><AgeRating>Teen</AgeRating></ComicInfo>")
        .unwrap();
    let v = violations("<ComicInfo><BlackAndWhite>Maybe</BlackAndWhite></ComicInfo>");
    assert_eq!(v[0].path, "ComicInfo/BlackAndWhite");
}

#[test]
fn test_community_rating() {
    validate("<ComicInfo><CommunityRating>4.5</CommunityRating></ComicInfo>").unwrap();
    validate("<ComicInfo><CommunityRating>5</CommunityRating></ComicInfo>").unwrap();

    let v = violations("<ComicInfo><CommunityRating>7.5</CommunityRating></ComicInfo>");
    assert_eq!(v[0].path, "ComicInfo/CommunityRating");
    let v = violations("<ComicInfo><CommunityRating>4.25</CommunityRating></ComicInfo>");
    assert_eq!(v[0].path, "ComicInfo/CommunityRating");
    let v = violations("<ComicInfo><CommunityRating>1e0</CommunityRating></ComicInfo>");
    assert_eq!(v[0].path, "ComicInfo/CommunityRating");
}

#[test]
fn test_pages() {
    validate(
        r#"<ComicInfo><Pages><Page Image="0" Type="FrontCover"/><Page Image="1" DoublePage="true"/></Pages></ComicInfo>"#,
    )
    .unwrap();

    let v = violations(r#"<ComicInfo><Pages><Page Type="Story"/></Pages></ComicInfo>"#);
    assert_eq!(v[0].path, "ComicInfo/Pages/Page[1]@Image");
    assert_eq!(v[0].message, "required attribute missing");

    let v = violations(r#"<ComicInfo><Pages><Page Image="0"/><Page Image="1" Kind="x"/></Pages></ComicInfo>"#);
    assert_eq!(v[0].path, "ComicInfo/Pages/Page[2]@Kind");

    let v = violations(r#"<ComicInfo><Pages><Image>0</Image></Pages></ComicInfo>"#);
    assert_eq!(v[0].path, "ComicInfo/Pages/Image");
}

#[test]
fn test_nested_child_in_simple_element() {
    let v = violations("<ComicInfo><Title><b>x</b></Title></ComicInfo>");
    assert_eq!(v[0].path, "ComicInfo/Title/b");
}

#[test]
fn test_every_violation_is_reported() {
    let v = violations("<ComicInfo><Year>soon</Year><Month>99</Month><Foo/></ComicInfo>");
    assert_eq!(v.len(), 3);
}

#[test]
fn test_malformed_xml() {
    assert!(matches!(
        validate("<ComicInfo><Title>x</Series></ComicInfo>"),
        Err(ComicInfoError::Xml(_))
    ));
}

#[test]
fn test_check_value() {
    assert!(check_value(Kind::Long, "9000000000").is_ok());
    assert!(check_value(Kind::Int { min: None, max: None }, "9000000000").is_err());
    assert!(check_value(Kind::Boolean, "yes").is_err());
}
