use super::*;

const SAMPLES: &[&str] = &[
    "ExampleAPI-1.20.1-forge.jar",
    "[JEI] JustEnoughItems-1.20.1.jar",
    "fabric-api-0.92.0+1.20.1.jar",
    "jei-1.20.1-forge-15.2.0.27.jar",
    "sodium-fabric-mc1.20.1-0.5.3.jar",
    "corelib.jar",
    "1.20.1.jar",
    "1.0.beta.jar",
    "",
    "3DSkinLayers-forge-1.20.1.jar",
    "create-1.20.1-0.5.1.f.jar",
    "【物品】物品管理器-1.0.jar",
    "SMOOTHBOOT-fabric-1.19.2.jar",
    "mod.name-1.0",
    "[JEI]-1.20.1.jar",
    "JEIIntegration_v5.jar",
    "cloth-config-11.1.106-fabric.jar",
];

#[test]
fn api_suffix_detached_from_camel_case() {
    let c = normalize("ExampleAPI-1.20.1-forge.jar");
    assert_eq!(c.name, "Example API");
    assert_eq!(c.suffix, SuffixKind::Api);
    assert_eq!(c.loader, Loader::Forge);
    assert_eq!(c.version.as_deref(), Some("1.20.1"));
}

#[test]
fn bracket_tags_are_kept_aside() {
    let c = normalize("[JEI] JustEnoughItems-1.20.1.jar");
    assert_eq!(c.name, "Just Enough Items");
    assert_eq!(c.tags, vec!["JEI".to_string()]);
    assert_eq!(c.queries(), vec!["Just Enough Items", "JEI"]);
}

#[test]
fn leading_loader_word_is_part_of_the_name() {
    let c = normalize("fabric-api-0.92.0+1.20.1.jar");
    assert_eq!(c.name, "Fabric API");
    assert_eq!(c.loader, Loader::None);
    assert_eq!(c.suffix, SuffixKind::Api);
}

#[test]
fn loader_and_versions_dropped() {
    let c = normalize("jei-1.20.1-forge-15.2.0.27.jar");
    assert_eq!(c.name, "Jei");
    assert_eq!(c.loader, Loader::Forge);
    assert_eq!(c.version.as_deref(), Some("1.20.1"));

    let c = normalize("sodium-fabric-mc1.20.1-0.5.3.jar");
    assert_eq!(c.name, "Sodium");
    assert_eq!(c.loader, Loader::Fabric);
    assert_eq!(c.version.as_deref(), Some("mc1.20.1"));
}

#[test]
fn glued_lib_suffix() {
    let c = normalize("corelib.jar");
    assert_eq!(c.name, "Core Lib");
    assert_eq!(c.suffix, SuffixKind::Lib);
}

#[test]
fn all_version_name_falls_back_to_tokens() {
    assert_eq!(normalize("1.20.1.jar").name, "1.20.1");
    assert_eq!(normalize("1.0.beta.jar").name, "1.0.beta");
}

#[test]
fn empty_input() {
    let c = normalize("");
    assert!(c.is_empty());
    assert!(c.queries().is_empty());
}

#[test]
fn digits_inside_words_survive() {
    let c = normalize("3DSkinLayers-forge-1.20.1.jar");
    assert_eq!(c.name, "3D Skin Layers");
    assert_eq!(c.loader, Loader::Forge);
}

#[test]
fn lettered_patch_version_dropped() {
    assert_eq!(normalize("create-1.20.1-0.5.1.f.jar").name, "Create");
}

#[test]
fn tag_only_name_uses_tag() {
    let c = normalize("[JEI]-1.20.1.jar");
    assert_eq!(c.name, "JEI");
    assert_eq!(c.queries(), vec!["JEI"]);
}

#[test]
fn non_ascii_names_pass_through() {
    let c = normalize("【物品】物品管理器-1.0.jar");
    assert_eq!(c.name, "物品管理器");
    assert_eq!(c.tags, vec!["物品".to_string()]);
}

#[test]
fn long_all_caps_word_title_cased() {
    assert_eq!(normalize("SMOOTHBOOT-fabric-1.19.2.jar").name, "Smoothboot");
}

#[test]
fn normalization_is_idempotent() {
    for raw in SAMPLES {
        let once = normalize(raw);
        let twice = normalize(&once.name);
        assert_eq!(twice.name, once.name, "not a fixed point for {raw:?}");
    }
}

#[test]
fn loader_glued_to_version_is_dropped() {
    let c = normalize("jei-forge1.20.1-15.2.0.jar");
    assert_eq!(c.name, "Jei");
    assert_eq!(c.loader, Loader::Forge);
    assert_eq!(c.version.as_deref(), Some("1.20.1"));

    let c = normalize("Sodium-fabric1.20.1-0.5.3.jar");
    assert_eq!(c.name, "Sodium");
    assert_eq!(c.loader, Loader::Fabric);

    let c = normalize("Mod-neoforge1.21.jar");
    assert_eq!(c.name, "Mod");
    assert_eq!(c.loader, Loader::NeoForge);
    assert_eq!(c.version.as_deref(), Some("1.21"));
}

#[test]
fn unknown_word_glued_to_version_is_kept() {
    assert_eq!(normalize("jei1.20.1.jar").name, "Jei1");
}

#[test]
fn pre_release_words_are_name_words_without_a_version() {
    assert_eq!(normalize("DevTools-1.0.jar").name, "Dev Tools");
    assert_eq!(normalize("BetaPlus-1.0.jar").name, "Beta Plus");
    assert_eq!(normalize("XMod-1.0.jar").name, "X Mod");
    assert_eq!(normalize("Pre-Game-Lobby-2.0.jar").name, "Pre Game Lobby");
    assert_eq!(normalize("ReleaseNotes-1.0.jar").name, "Release Notes");
}

#[test]
fn pre_release_word_after_version_is_dropped() {
    let c = normalize("Mod-1.0-beta.jar");
    assert_eq!(c.name, "Mod");
    assert_eq!(c.version.as_deref(), Some("1.0"));
    assert_eq!(normalize("Mod-1.0-beta2.jar").name, "Mod");
}

#[test]
fn case_mapping_edge_cases_are_stable() {
    for raw in ["v2SMOOTH-物品.jar", "NEO v2-a1SMOOTH.jar", "ßbeta.jar", "AİBCDEF.jar"] {
        let once = normalize(raw);
        assert_eq!(normalize(&once.name).name, once.name, "{raw:?}");
    }
    assert_eq!(normalize("v2SMOOTH-物品.jar").name, "V2smooth 物品");
    assert_eq!(normalize("ßbeta.jar").name, "ßbeta");
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    const PIECES: &[&str] = &[
        "jei", "Forge", "fabric", "neoforge", "1.20.1", "v2", "mc1.19", "beta", "Dev", "x",
        "API", "lib", "corelib", "SMOOTHBOOT", "JustEnoughItems", "ExampleAPI", "3D", "物品",
        "ß", "İ", "a1SMOOTH", "Pre", "rc1", "0.5.1.f", "forge1.20.1", "[JEI]", "【物品】",
        "Library", "mc1aBeta", "1",
    ];
    const SEPARATORS: &[&str] = &["-", "_", " ", ".", "+", ""];

    fn token_mix() -> impl Strategy<Value = String> {
        (
            prop::collection::vec(
                (prop::sample::select(PIECES), prop::sample::select(SEPARATORS)),
                1..6,
            ),
            any::<bool>(),
        )
            .prop_map(|(parts, jar)| {
                let mut name: String = parts.iter().map(|(p, s)| format!("{p}{s}")).collect();
                if jar {
                    name.push_str(".jar");
                }
                name
            })
    }

    proptest! {
        #[test]
        fn idempotent_on_token_mixes(raw in token_mix()) {
            let once = normalize(&raw);
            let twice = normalize(&once.name);
            prop_assert_eq!(&twice.name, &once.name, "not a fixed point for {:?}", raw);
        }

        #[test]
        fn idempotent_on_arbitrary_names(raw in "[a-zA-Z0-9ßİ物品 ._+\\-\\[\\]【】]{0,24}") {
            let once = normalize(&raw);
            let twice = normalize(&once.name);
            prop_assert_eq!(&twice.name, &once.name, "not a fixed point for {:?}", raw);
        }
    }
}

#[test]
fn custom_loader_vocabulary() {
    let mut vocab = VocabularyConfig::default();
    vocab.loaders.insert("liteloader".to_string(), Loader::Rift);
    let n = NameNormalizer::from_vocabulary(&vocab);
    let c = n.normalize("Minimap-liteloader-1.12.2.jar");
    assert_eq!(c.name, "Minimap");
    assert_eq!(c.loader, Loader::Rift);
}
