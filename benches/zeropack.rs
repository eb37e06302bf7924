use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use zeropack::Schema;

#[derive(bitcode::Encode, bitcode::Decode, zeropack::Encode, zeropack::Decode, Debug)]
#[schema(path = "benches/schemas/small_enum.json")]
enum GameMode {
    Normal,
}

#[derive(bitcode::Encode, bitcode::Decode, zeropack::Encode, zeropack::Decode, Debug)]
#[schema(path = "benches/schemas/small_enum.json")]
enum Language {
    English,
    French,
}

#[derive(bitcode::Encode, bitcode::Decode, zeropack::Encode, zeropack::Decode, Debug)]
#[schema(path = "benches/schemas/small_enum.json")]
enum RegenChallengeDifficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(bitcode::Encode, bitcode::Decode, zeropack::Encode, zeropack::Decode, Debug)]
#[schema(path = "benches/schemas/scratchphrase_rules.json")]
struct ScratchphraseRules {
    language: Language,
    game_mode: GameMode,
    regen_challenge_difficulty: RegenChallengeDifficulty,
    regen_challenges: u8,
    solves_per_syllable: i64,
    turn_duration: u16,
    starting_lives: u8,
    max_lives: u8,
    syllable_duration: u8,
    allow_hyphens_and_apostrophes_in_syllables: bool,
}

#[derive(bitcode::Encode, bitcode::Decode, zeropack::Encode, zeropack::Decode, Debug)]
#[schema(path = "benches/schemas/chat_message.json")]
struct ChatMessage {
    reactions: Vec<i64>,
    message: String,
    player_id: u64,
    #[schema(rename = "replyTo")]
    reply_to: Option<u64>,
}

fn load(path: &str) -> Schema {
    Schema::from_file(format!("{}/{}", env!("CARGO_MANIFEST_DIR"), path)).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let rules_schema = load("benches/schemas/scratchphrase_rules.json");
    let rules = ScratchphraseRules {
        language: Language::English,
        game_mode: GameMode::Normal,
        regen_challenge_difficulty: RegenChallengeDifficulty::Easy,
        regen_challenges: 2,
        solves_per_syllable: 500,
        turn_duration: 5,
        starting_lives: 2,
        max_lives: 3,
        syllable_duration: 2,
        allow_hyphens_and_apostrophes_in_syllables: false,
    };

    let chat_schema = load("benches/schemas/chat_message.json");
    let chat = ChatMessage {
        reactions: vec![1, -4, 300, 70_000],
        message: "gg, next round starts in 5".to_string(),
        player_id: 9_007_199_254,
        reply_to: Some(42),
    };

    let rules_packet = zeropack::encode(&rules_schema, 1, &rules).unwrap();
    let rules_bitcode = bitcode::encode(&rules);
    let chat_packet = zeropack::encode(&chat_schema, 2, &chat).unwrap();
    let chat_bitcode = bitcode::encode(&chat);

    c.bench_function("zeropack encode rules", |b| {
        b.iter(|| {
            black_box(zeropack::encode(&rules_schema, 1, black_box(&rules)).unwrap());
        });
    });

    c.bench_function("bitcode encode rules", |b| {
        b.iter(|| {
            black_box(bitcode::encode(black_box(&rules)));
        });
    });

    c.bench_function("zeropack decode rules", |b| {
        b.iter(|| {
            black_box(zeropack::decode_packet::<ScratchphraseRules>(&rules_schema, black_box(&rules_packet)).unwrap());
        });
    });

    c.bench_function("bitcode decode rules", |b| {
        b.iter(|| {
            black_box(bitcode::decode::<ScratchphraseRules>(black_box(&rules_bitcode)).unwrap());
        });
    });

    c.bench_function("zeropack encode chat", |b| {
        b.iter(|| {
            black_box(zeropack::encode(&chat_schema, 2, black_box(&chat)).unwrap());
        });
    });

    c.bench_function("bitcode encode chat", |b| {
        b.iter(|| {
            black_box(bitcode::encode(black_box(&chat)));
        });
    });

    c.bench_function("zeropack decode chat", |b| {
        b.iter(|| {
            black_box(zeropack::decode_packet::<ChatMessage>(&chat_schema, black_box(&chat_packet)).unwrap());
        });
    });

    c.bench_function("bitcode decode chat", |b| {
        b.iter(|| {
            black_box(bitcode::decode::<ChatMessage>(black_box(&chat_bitcode)).unwrap());
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
