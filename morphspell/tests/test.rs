use std::sync::{Arc, RwLock};

use morphspell::{
    AffixCondition, AffixData, AffixEntry, AffixKind, AffixRule, AffixTable, Flag, FlagMode,
    FlagSet, MorphField, SpellError, Speller, SpellerHunspellDict, WordEntry, WordIndex,
};

fn load(dic: &str, aff: &str) -> SpellerHunspellDict {
    let speller = SpellerHunspellDict::new(dic, aff).unwrap();
    assert!(speller.get_errors().is_empty(), "{:?}", speller.get_errors());
    speller
}

fn en() -> SpellerHunspellDict {
    load(include_str!("files/en.dic"), include_str!("files/en.aff"))
}

fn compound() -> SpellerHunspellDict {
    load(
        include_str!("files/compound.dic"),
        include_str!("files/compound.aff"),
    )
}

fn numbers() -> SpellerHunspellDict {
    load(
        include_str!("files/numbers.dic"),
        include_str!("files/numbers.aff"),
    )
}

fn morph() -> SpellerHunspellDict {
    load(include_str!("files/morph.dic"), include_str!("files/morph.aff"))
}

#[test]
fn match_root_words() {
    let speller = en();

    assert!(speller.spellcheck("Alberta"));
    assert!(speller.spellcheck("angle"));
    assert!(speller.spellcheck("anglicism"));
    assert!(speller.spellcheck("anoint"));
    assert!(speller.spellcheck("appear"));
    assert!(speller.spellcheck("apply"));

    assert!(!speller.spellcheck("alberta"));
    assert!(!speller.spellcheck("agnle"));
    assert!(!speller.spellcheck("anglisism"));
    assert!(!speller.spellcheck("apear"));
}

#[test]
fn match_prefixes() {
    let speller = en();

    assert!(speller.spellcheck("reappear")); // A
    assert!(speller.spellcheck("disappear")); // E
    assert!(speller.spellcheck("reapply")); // A

    assert!(!speller.spellcheck("unappear")); // U (flag not present)
}

#[test]
fn match_suffixes() {
    let speller = en();

    assert!(speller.spellcheck("Alberta's")); // M

    assert!(speller.spellcheck("angle's")); // M
    assert!(speller.spellcheck("anglers")); // Z
    assert!(speller.spellcheck("angling")); // G
    assert!(speller.spellcheck("angled")); // D
    assert!(speller.spellcheck("angler")); // R
    assert!(speller.spellcheck("angles")); // S

    assert!(speller.spellcheck("anglicisms")); // S

    assert!(speller.spellcheck("anointing")); // G
    assert!(speller.spellcheck("anointed")); // D
    assert!(speller.spellcheck("anointer")); // R
    assert!(speller.spellcheck("anointment")); // L
    assert!(speller.spellcheck("anoints")); // S

    assert!(speller.spellcheck("appears")); // S
    assert!(speller.spellcheck("appeared")); // D
    assert!(speller.spellcheck("appearing")); // G

    assert!(speller.spellcheck("application")); // N
    assert!(speller.spellcheck("applications")); // X
    assert!(speller.spellcheck("applying")); // G
    assert!(speller.spellcheck("applied")); // D
    assert!(speller.spellcheck("applies")); // S

    assert!(!speller.spellcheck("applyication")); // badly applied N
    assert!(!speller.spellcheck("applyications")); // badly applied X
    assert!(!speller.spellcheck("applyed")); // badly applied D
    assert!(!speller.spellcheck("applyes")); // badly applied S

    assert!(!speller.spellcheck("applion")); // wrong N
    assert!(!speller.spellcheck("appleion")); // badly applied N
    assert!(!speller.spellcheck("applyen")); // wrong N
}

#[test]
fn match_cross_product() {
    let speller = en();

    assert!(speller.spellcheck("reapplied"));
    assert!(speller.spellcheck("disappearing"));
    assert!(speller.spellcheck("reappears"));
    assert!(speller.spellcheck("reapplications"));
    assert!(!speller.spellcheck("unapplied")); // U (flag not present)
}

#[test]
fn match_case_variants() {
    let speller = en();

    assert!(speller.spellcheck("Angle"));
    assert!(speller.spellcheck("ANGLE"));
    assert!(speller.spellcheck("ALBERTA"));
    assert!(speller.spellcheck("Reapplied"));
    assert!(!speller.spellcheck("aNGLE"));
}

#[test]
fn match_word_breaks() {
    let speller = en();

    assert!(speller.spellcheck("angle-apply"));
    assert!(speller.spellcheck("-angle"));
    assert!(speller.spellcheck("angle-"));
    assert!(!speller.spellcheck("angle-agnle"));
}

#[test]
fn numbers_are_words() {
    let speller = en();

    assert!(speller.spellcheck("1,000.50"));
    assert!(speller.spellcheck("-12"));
    assert!(!speller.spellcheck("12a"));
}

#[test]
fn forbidden_words() {
    let speller = en();

    assert!(speller.spellcheck("bar"));
    assert!(!speller.spellcheck("bars"));
    assert!(!speller.spellcheck("Bars"));
}

#[test]
fn spellcheck_is_idempotent() {
    let speller = en();
    for word in ["reapplied", "agnle", "bars", "Alberta's"] {
        assert_eq!(speller.spellcheck(word), speller.spellcheck(word));
    }
}

#[test]
fn suggest() {
    let speller = en();

    assert_eq!(Some("appear"), speller.suggestions("apear", 5).first().map(String::as_str));
    assert_eq!(Some("Appear"), speller.suggestions("Apear", 5).first().map(String::as_str));
    assert_eq!(Some("angle"), speller.suggestions("agnle", 5).first().map(String::as_str));
    assert_eq!(Some("Alberta"), speller.suggestions("alberta", 5).first().map(String::as_str));
    assert!(speller
        .suggestions("applyangle", 10)
        .contains(&"apply angle".to_string()));
}

#[test]
fn suggest_respects_limits() {
    let speller = en();

    assert!(speller.suggestions("apear", 0).is_empty());
    assert!(speller.suggestions("", 5).is_empty());
    assert!(speller.suggestions("anglers", 3).len() <= 3);
    assert_eq!(speller.suggestions("agnle", 5), speller.suggestions("agnle", 5));
}

#[test]
fn suggest_skips_nosuggest_and_forbidden() {
    let speller = en();

    assert!(speller.spellcheck("darn"));
    assert!(!speller.suggestions("darm", 10).contains(&"darn".to_string()));
    assert!(!speller.suggestions("barz", 10).contains(&"bars".to_string()));
}

#[test]
fn suggest_rep_after_edits() {
    let speller = load(
        "2\nphone\nbone\n",
        "TRY abcdefghijklmnopqrstuvwxyz\nREP 1\nREP f ph\n",
    );
    assert_eq!(vec!["bone", "phone"], speller.suggestions("fone", 5));
}

#[test]
fn conversions() {
    let speller = load(
        "2\ndon't\nwalk\n",
        "TRY '\nIGNORE \u{AD}\nICONV 1\nICONV ’ '\nOCONV 1\nOCONV ' ’\n",
    );
    assert!(speller.spellcheck("don’t"));
    assert!(speller.spellcheck("wal\u{AD}k"));
    assert_eq!(vec!["don’t"], speller.suggestions("dont", 3));
}

#[test]
fn turkish_case() {
    let speller = load("1\nistanbul\n", "LANG tr_TR\n");

    assert!(speller.spellcheck("İstanbul"));
    assert!(speller.spellcheck("İSTANBUL"));
    assert!(!speller.spellcheck("ISTANBUL"));
}

#[test]
fn keepcase_and_needaffix() {
    let speller = load(
        "6\nMcDonald/K\nbach/K\nhello\nsec/N\nsec\npseudo/NS\n",
        "KEEPCASE K\nNEEDAFFIX N\nSFX S Y 1\nSFX S 0 s .\n",
    );

    assert!(speller.spellcheck("McDonald"));
    assert!(!speller.spellcheck("mcdonald"));
    assert!(!speller.spellcheck("MCDONALD"));
    assert!(speller.spellcheck("bach"));
    assert!(!speller.spellcheck("Bach"));

    assert!(speller.spellcheck("hello"));
    assert!(speller.spellcheck("Hello"));
    assert!(speller.spellcheck("HELLO"));

    // one of the homonyms doesn't need an affix
    assert!(speller.spellcheck("sec"));
    assert!(!speller.spellcheck("pseudo"));
    assert!(speller.spellcheck("pseudos"));
}

#[test]
fn tables_from_parts() {
    let flags = |f: &str| FlagSet::parse(f, FlagMode::CharFlags).unwrap();

    let mut affix_data = AffixData::new();
    affix_data.special_flags.need_affix = Some('N' as Flag);
    affix_data.special_flags.keep_case = Some('K' as Flag);
    affix_data.special_flags.compound_flag = Some('X' as Flag);
    affix_data.special_flags.only_in_compound = Some('O' as Flag);
    let mut rule = AffixRule::new(AffixKind::Suffix, 'S' as Flag, true);
    let entry = AffixEntry::new(
        &rule,
        "",
        "s",
        AffixCondition::new(".").unwrap(),
        FlagSet::new(),
        Vec::new(),
    );
    rule.entries.push(entry);
    affix_data.affixes = AffixTable::new(Vec::new(), vec![rule]);

    let mut words = WordIndex::new();
    for (stem, f) in [("pseudo", "NS"), ("hello", "K"), ("tiger", "XO"), ("house", "X")] {
        words.add(WordEntry::new(stem, flags(f), Vec::new()));
    }
    let speller = SpellerHunspellDict::from_parts(affix_data, words);

    assert!(!speller.spellcheck("pseudo"));
    assert!(speller.spellcheck("pseudos"));
    assert!(speller.spellcheck("hello"));
    assert!(!speller.spellcheck("Hello"));
    assert!(!speller.spellcheck("tiger"));
    assert!(speller.spellcheck("tigerhouse"));
}

#[test]
fn compound_positions() {
    let speller = compound();

    assert!(speller.spellcheck("foobar"));
    assert!(speller.spellcheck("foomidbar"));
    assert!(speller.spellcheck("foobars"));
    assert!(speller.spellcheck("foo"));
    assert!(!speller.spellcheck("barfoo"));
    assert!(!speller.spellcheck("midbar"));
    assert!(!speller.spellcheck("fobar"));
}

#[test]
fn compound_flag() {
    let speller = compound();

    assert!(speller.spellcheck("workhouse"));
    assert!(speller.spellcheck("houseworks"));
    assert!(speller.spellcheck("Workhouse"));
    assert!(!speller.spellcheck("workshouse")); // suffix inside a compound
    assert!(!speller.spellcheck("tiger")); // only in compounds
    assert!(speller.spellcheck("tigerhouse"));
}

#[test]
fn compound_checks() {
    let speller = compound();

    assert!(!speller.spellcheck("househouse")); // CHECKCOMPOUNDDUP
    assert!(speller.spellcheck("houseworkhouse"));
    assert!(!speller.spellcheck("houseworkhousework")); // COMPOUNDWORDMAX
    assert!(speller.spellcheck("seabass"));
    assert!(!speller.spellcheck("basssea")); // CHECKCOMPOUNDTRIPLE
    assert!(speller.spellcheck("Pariswork"));
    assert!(!speller.spellcheck("workParis")); // CHECKCOMPOUNDCASE
}

#[test]
fn compound_case_in_one_case_words() {
    let speller = load(
        "4\nfoo/X\nbar/X\nFOO/X\nBAR/X\n",
        "COMPOUNDFLAG X\nCHECKCOMPOUNDCASE\n",
    );

    assert!(speller.spellcheck("foobar"));
    assert!(speller.spellcheck("FOOBAR"));
    assert!(!speller.spellcheck("FOObar"));
    assert!(!speller.spellcheck("fooBAR"));
}

#[test]
fn compound_patterns() {
    let speller = load(
        "4\nfoo/X\nbar/X\nkönny/X\nnyelv/X\n",
        "COMPOUNDFLAG X\nCHECKCOMPOUNDPATTERN 2\nCHECKCOMPOUNDPATTERN nny ny\nCHECKCOMPOUNDPATTERN o b z\n",
    );

    assert!(!speller.spellcheck("könnynyelv"));
    assert!(speller.spellcheck("nyelvkönny"));
    assert!(speller.spellcheck("fozar"));
    assert!(speller.spellcheck("barfoo"));
    assert!(!speller.spellcheck("fozoo"));
}

#[test]
fn compound_rules() {
    let speller = numbers();

    for word in ["1st", "2nd", "3rd", "4th", "10th", "11th", "12th", "21st", "22nd", "100th"] {
        assert!(speller.spellcheck(word), "{}", word);
    }
    for word in ["1th", "2th", "11st", "12nd", "13rd", "st"] {
        assert!(!speller.spellcheck(word), "{}", word);
    }
}

#[test]
fn stems() {
    let speller = morph();

    assert_eq!(vec!["walk"], speller.stem("rewalked"));
    assert_eq!(vec!["walk"], speller.stem("Walks"));
    assert_eq!(vec!["drink"], speller.stem("drinkables"));
    assert_eq!(vec!["nagy"], speller.stem("legnagyobb"));
    assert!(speller.stem("walkable").is_empty());

    let speller = compound();
    assert_eq!(vec!["housework"], speller.stem("houseworks"));
}

#[test]
fn analyses() {
    let speller = morph();

    assert_eq!(
        vec!["st:walk po:verb dp:re is:past"],
        speller.analyze("rewalked")
    );
    assert_eq!(
        vec!["st:drink po:verb ds:able is:plural"],
        speller.analyze("drinkables")
    );
    assert_eq!(
        vec!["st:nagy po:adj is:comparative"],
        speller.analyze("nagyobb")
    );
    assert_eq!(
        vec!["st:nagy po:adj is:superlative"],
        speller.analyze("legnagyobb")
    );
    assert_eq!(vec!["st:house po:noun"], speller.analyze("house"));
    assert!(speller.analyze("drinks").is_empty());
}

#[test]
fn two_level_suffixes_and_circumfix() {
    let speller = morph();

    assert!(speller.spellcheck("drinkable"));
    assert!(speller.spellcheck("drinkables"));
    assert!(!speller.spellcheck("drinks"));

    assert!(speller.spellcheck("nagyobb"));
    assert!(speller.spellcheck("legnagyobb"));
    assert!(!speller.spellcheck("legnagy"));
}

#[test]
fn add_and_remove_words() {
    let mut speller = en();

    assert!(!speller.spellcheck("xyzzy"));
    assert!(speller.add_word("xyzzy"));
    assert!(speller.spellcheck("xyzzy"));
    assert!(speller.spellcheck("Xyzzy"));
    assert!(speller.remove_word("xyzzy"));
    assert!(!speller.spellcheck("xyzzy"));
    assert!(!speller.remove_word("xyzzy"));
    assert!(!speller.add_word("  "));

    // removing a root also removes its derived forms
    assert!(speller.remove_word("angle"));
    assert!(!speller.spellcheck("angles"));
}

#[test]
fn add_word_overrides_forbidden() {
    let mut speller = en();

    assert!(!speller.spellcheck("bars"));
    speller.add_word("bars");
    assert!(speller.spellcheck("bars"));
    assert_eq!(1, speller.remove_word_matching("bars", |entry| entry.flags.is_empty()));
    assert!(!speller.spellcheck("bars"));
}

#[test]
fn add_words_with_affixes() {
    let mut speller = morph();

    assert!(speller.add_word_with_affix("talk", "walk"));
    assert!(speller.spellcheck("retalked"));
    assert_eq!(vec!["st:talk po:verb is:sg3"], speller.analyze("talks"));
    assert!(!speller.add_word_with_affix("zork", "missing"));

    assert_eq!(Ok(true), speller.add_word_with_flags("jump", "SD"));
    assert!(speller.spellcheck("jumped"));
    assert!(!speller.spellcheck("rejumped"));

    let flags = FlagSet::parse("S", FlagMode::CharFlags).unwrap();
    assert!(speller.add_entry("run", flags, vec![MorphField::new("po", "verb")]));
    assert_eq!(vec!["st:run po:verb is:sg3"], speller.analyze("runs"));
}

#[test]
fn load_errors() {
    let speller = SpellerHunspellDict::new(
        "3\nfoo/ab\nbar/abc\n\tcomment line\n",
        "FLAG long\nSFX ab Y 1\nSFX ab 0 s .\n",
    )
    .unwrap();

    assert_eq!(1, speller.get_errors().len());
    assert!(matches!(
        speller.get_errors()[0],
        SpellError::MalformedFlagData { .. }
    ));
    assert!(speller.spellcheck("foos"));
    assert!(!speller.spellcheck("bar"));

    assert!(SpellerHunspellDict::new("0\n", "SET ISO8859-1\n").is_err());
    assert!(SpellerHunspellDict::new("0\n", "FLAG sideways\n").is_err());
}

#[test]
fn flag_aliases() {
    let speller = load(
        "2\nwalk/1\ntalk/2\n",
        "AF 2\nAF SD\nAF S\nSFX S Y 1\nSFX S 0 s .\nSFX D Y 1\nSFX D 0 ed .\n",
    );

    assert!(speller.spellcheck("walked"));
    assert!(speller.spellcheck("talks"));
    assert!(!speller.spellcheck("talked"));
}

#[test]
fn shared_between_threads() {
    let speller = Arc::new(RwLock::new(en()));

    let handles = (0..4)
        .map(|_| {
            let speller = Arc::clone(&speller);
            std::thread::spawn(move || {
                let speller = speller.read().unwrap();
                speller.spellcheck("reapplied") && !speller.spellcheck("agnle")
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        assert!(handle.join().unwrap());
    }

    speller.write().unwrap().add_word("xyzzy");
    assert!(speller.read().unwrap().spellcheck("xyzzy"));
}

#[test]
fn check_words_in_parallel() {
    let speller = en();

    assert_eq!(
        vec![true, false, true, false],
        speller.check_words(&["angles", "agnle", "disappeared", "bars"])
    );
}
