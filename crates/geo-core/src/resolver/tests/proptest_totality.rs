//! Property-based tests for the resolution pass.
//!
//! Random token streams drawn from place names, suffix-bearing tokens,
//! antileaders, stoppers and particles must always resolve, and the output
//! must spell exactly the input.

use proptest::prelude::*;

use super::*;
use crate::settings::SuffixSetting;

// ---------------------------------------------------------------------------
// Token pool
// ---------------------------------------------------------------------------

const POOL: &[(&str, &str)] = &[
    ("府中", PLACE),
    ("駅", GENERAL_SUFFIX),
    ("千代田", PLACE),
    ("区", REGION_SUFFIX),
    ("南", PROPER),
    ("相馬市", PLACE),
    ("相馬", PLACE),
    ("新宿", PROPER),
    ("御苑", PROPER),
    ("田中", PERSON),
    ("調査", SAHEN),
    ("本部", GENERAL),
    ("の", "助詞,連体化,*,*,*,*"),
    ("に", PARTICLE),
    ("～", SAHEN),
    ("付近", GENERAL),
    ("\n", "記号,制御コード,改行,*,*,*"),
];

fn fixture() -> GeowordResolver {
    let mut settings = default_settings();
    settings.profile.suffixes.push(SuffixSetting {
        surface: "市".to_string(),
        reading: "シ".to_string(),
        pronunciation: "シ".to_string(),
    });
    resolver_with(
        &settings,
        vec![
            vec![
                place("fuchu", "府中", "ふちゅう"),
                place("fuchu_sta", "府中駅", "ふちゅうえき"),
                with_suffix(place("chiyoda", "千代田", "ちよだ"), &["区", ""]),
                place("minamisoma", "南相馬", "みなみそうま"),
            ],
            vec![
                place("shinjuku", "新宿", "しんじゅく"),
                place("gyoen", "御苑", "ぎょえん"),
                place("tanaka", "田中", "たなか"),
                place("honbu", "本部", "ほんぶ"),
            ],
        ],
    )
}

fn arb_tokens() -> impl Strategy<Value = Vec<Token>> {
    prop::collection::vec(prop::sample::select(POOL.to_vec()), 0..16).prop_map(|picks| {
        picks
            .into_iter()
            .map(|(surface, feature)| tok(surface, feature))
            .collect()
    })
}

fn concat(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.surface.as_str()).collect()
}

// ---------------------------------------------------------------------------
// proptest entry point
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn output_spells_input(tokens in arb_tokens()) {
        let r = fixture();
        let out = r.resolve(&tokens).unwrap();
        prop_assert_eq!(concat(&out), concat(&tokens));
        prop_assert!(out.len() <= tokens.len() * 2);
        prop_assert!(out.iter().all(|t| !t.surface.is_empty()));
    }

    #[test]
    fn geoword_ids_are_never_empty(tokens in arb_tokens()) {
        let r = fixture();
        for t in r.resolve(&tokens).unwrap() {
            if t.is_geoword() {
                prop_assert!(!t.geoword_ids().is_empty());
            }
        }
    }

    #[test]
    fn excluded_dictionary_never_appears(tokens in arb_tokens()) {
        let mut r = fixture();
        r.set_active_dictionaries(&[2]).unwrap();
        for t in r.resolve(&tokens).unwrap() {
            for (id, _) in t.geoword_ids() {
                prop_assert!(!["fuchu", "fuchu_sta", "chiyoda", "minamisoma"].contains(&id));
            }
        }
    }
}
