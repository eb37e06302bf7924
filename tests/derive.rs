use zeropack::traits::{Decode as _, Encode as _};
use zeropack::{Date, Decode, DecodeError, Encode, Schema, Value};

#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq)]
#[schema(path = "tests/schemas/rank.json")]
enum Rank {
    Bronze,
    Silver,
    Gold,
}

#[derive(Encode, Decode, Debug, Clone, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Encode, Decode, Debug, Clone, PartialEq)]
#[schema(path = "tests/schemas/player.json")]
struct Player {
    user_name: String,
    level: u8,
    rank: Rank,
    scores: Vec<u32>,
    position: Position,
    clan: Option<String>,
    joined: Date,
}

#[derive(Encode, Decode, Debug, PartialEq)]
struct Renamed {
    #[schema(rename = "ID")]
    id: u16,
    display_name_opt: Option<String>,
}

fn player_schema() -> Schema {
    Schema::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/schemas/player.json")).unwrap()
}

fn player() -> Player {
    Player {
        user_name: "zerobone".to_string(),
        level: 12,
        rank: Rank::Silver,
        scores: vec![10, 70_000],
        position: Position { x: 1.5, y: -2.0 },
        clan: None,
        joined: Date::from_millis(1_111_111_112),
    }
}

#[test]
fn struct_round_trip() {
    let schema = player_schema();
    let player = player();

    let packet = zeropack::encode(&schema, 9, &player).unwrap();
    let (packet_id, decoded) = zeropack::decode_packet::<Player>(&schema, &packet).unwrap();
    assert_eq!(packet_id, 9);
    assert_eq!(decoded, player);

    let with_clan = Player {
        clan: Some("owls".to_string()),
        ..player
    };
    let packet = zeropack::encode(&schema, 9, &with_clan).unwrap();
    assert_eq!(zeropack::decode::<Player>(&schema, &packet[2..]).unwrap(), with_clan);
}

#[test]
fn struct_layout_follows_sorted_keys() {
    let schema = player_schema();
    let packet = zeropack::encode(&schema, 1, &player()).unwrap();

    // clan_opt, joined, level, position { x, y }, rank, scores, userName
    let expected = [
        "0001",
        "00",
        "e0000000423a35c8",
        "0c",
        "3fc00000",
        "c0000000",
        "01",
        "00000002",
        "0000000a",
        "00011170",
        "087a65726f626f6e65",
    ]
    .concat();
    assert_eq!(hex::encode(&packet), expected);
}

#[test]
fn values_use_camel_case_keys() {
    let value = player().to_value().unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object["userName"], Value::from("zerobone"));
    assert_eq!(object["rank"], Value::Int(1));
    assert!(!object.contains_key("clan"));
    assert!(object["position"].as_object().is_some());
}

#[test]
fn renamed_fields() {
    let value = Renamed {
        id: 7,
        display_name_opt: Some("x".to_string()),
    }
    .to_value()
    .unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object["ID"], Value::Int(7));
    assert_eq!(object["displayNameOpt"], Value::from("x"));

    let decoded = Renamed::from_value(value).unwrap();
    assert_eq!(decoded.id, 7);
}

#[test]
fn enum_indexes() {
    assert_eq!(Rank::Gold.to_value(), Ok(Value::Int(2)));
    assert_eq!(Rank::from_value(Value::Int(0)), Ok(Rank::Bronze));
    assert!(matches!(Rank::from_value(Value::Int(3)), Err(DecodeError::OutOfBounds(_))));
}

#[test]
fn missing_required_member() {
    let value: Value = [("x", 1.0)].into_iter().collect();
    assert_eq!(
        Position::from_value(value),
        Err(DecodeError::MissingField("y".to_string()))
    );
}

#[test]
fn decoded_values_must_fit_the_field_type() {
    let schema = Schema::from_json_str(r#"{ "x": "DOUBLE", "y": "VSTRING" }"#).unwrap();
    let value: Value = [("x", Value::Float(1.0)), ("y", Value::from("no"))].into_iter().collect();
    let packet = schema.encode(0, &value).unwrap();
    assert_eq!(
        zeropack::decode::<Position>(&schema, &packet[2..]),
        Err(DecodeError::TypeMismatch { expected: "number", found: "string" })
    );
}
