use stenodrill_core::dictionary::Dictionary;
use stenodrill_core::engine::{PracticeConfig, PracticeSession, SessionUpdate, WordOrder};
use stenodrill_core::simulator::{QwertySimulator, SimulatorOutput};
use stenodrill_core::types::{KeyColor, StenoKey};
use std::path::PathBuf;

fn sample_dictionary() -> Dictionary {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("..");
    p.push("..");
    p.push("dictionaries");

    Dictionary::load_default(&p).expect("load sample dictionaries")
}

fn sequential_session() -> PracticeSession {
    let config = PracticeConfig {
        order: WordOrder::Sequential,
        ..PracticeConfig::default()
    };
    PracticeSession::new(sample_dictionary().into_entries(), config).expect("session")
}

fn run_qwerty(
    session: &mut PracticeSession,
    sim: &mut QwertySimulator,
    key: &str,
    down: bool,
    out: &mut Vec<SessionUpdate>,
) {
    let res = if down { sim.press(key) } else { sim.release(key) };
    if let SimulatorOutput::Steno(event) = res {
        out.extend(session.process_event(event));
    }
}

fn completed_words(updates: &[SessionUpdate]) -> Vec<String> {
    updates
        .iter()
        .filter_map(|u| match u {
            SessionUpdate::WordCompleted { word, .. } => Some(word.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn sample_dictionaries_load_with_phrases() {
    let dict = sample_dictionary();
    let the_cat = dict
        .entries()
        .iter()
        .find(|e| e.word() == "the cat")
        .expect("phrase entry");
    // "the" has two outlines, "cat" one.
    assert_eq!(the_cat.outlines().len(), 2);
    assert!(the_cat.outlines().iter().all(|o| o.len() == 2));

    assert!(dict.entries().iter().any(|e| e.word() == "do you"));
}

#[test]
fn qwerty_typing_completes_first_words() {
    let mut session = sequential_session();
    let mut sim = QwertySimulator::new();
    let mut all = Vec::new();

    // the: -T on 'o'
    run_qwerty(&mut session, &mut sim, "o", true, &mut all);
    run_qwerty(&mut session, &mut sim, "o", false, &mut all);

    // of: -F on 'y'
    run_qwerty(&mut session, &mut sim, "y", true, &mut all);
    run_qwerty(&mut session, &mut sim, "y", false, &mut all);

    // and: SKP rolled, S- released before P- goes down
    run_qwerty(&mut session, &mut sim, "a", true, &mut all);
    run_qwerty(&mut session, &mut sim, "s", true, &mut all);
    run_qwerty(&mut session, &mut sim, "a", false, &mut all);
    run_qwerty(&mut session, &mut sim, "e", true, &mut all);
    run_qwerty(&mut session, &mut sim, "s", false, &mut all);
    run_qwerty(&mut session, &mut sim, "e", false, &mut all);

    assert_eq!(completed_words(&all), vec!["the", "of", "and"]);
    assert_eq!(session.streak(), 3);
    assert_eq!(session.current_entry().word(), "to");
}

#[test]
fn auto_repeat_and_shared_keys_do_not_split_the_stroke() {
    let mut session = sequential_session();
    let mut sim = QwertySimulator::new();
    let mut all = Vec::new();

    // Skip ahead to "is" (S).
    while session.current_entry().word() != "is" {
        session.skip_word();
    }

    // Both physical S- keys, with auto-repeat on the first one.
    run_qwerty(&mut session, &mut sim, "q", true, &mut all);
    run_qwerty(&mut session, &mut sim, "q", true, &mut all);
    run_qwerty(&mut session, &mut sim, "a", true, &mut all);
    run_qwerty(&mut session, &mut sim, "q", false, &mut all);
    assert!(completed_words(&all).is_empty());
    assert_eq!(
        session.current_colors().steno.get(StenoKey::LeftS),
        KeyColor::CorrectHeld
    );

    run_qwerty(&mut session, &mut sim, "a", false, &mut all);
    assert_eq!(completed_words(&all), vec!["is"]);
}

#[test]
fn re_pressing_a_key_within_a_stroke_keeps_it() {
    let mut session = sequential_session();
    let mut sim = QwertySimulator::new();
    let mut all = Vec::new();

    while session.current_entry().word() != "cat" {
        session.skip_word();
    }

    // K- A, release K-, press it again before letting go of A, then -T.
    run_qwerty(&mut session, &mut sim, "s", true, &mut all);
    run_qwerty(&mut session, &mut sim, "c", true, &mut all);
    run_qwerty(&mut session, &mut sim, "s", false, &mut all);
    run_qwerty(&mut session, &mut sim, "s", true, &mut all);
    run_qwerty(&mut session, &mut sim, "o", true, &mut all);
    run_qwerty(&mut session, &mut sim, "c", false, &mut all);
    run_qwerty(&mut session, &mut sim, "s", false, &mut all);
    run_qwerty(&mut session, &mut sim, "o", false, &mut all);

    assert_eq!(completed_words(&all), vec!["cat"]);
}

#[test]
fn wrong_second_stroke_restarts_the_word() {
    let mut session = sequential_session();
    let mut sim = QwertySimulator::new();
    let mut all = Vec::new();

    while session.current_entry().word() != "pick" {
        session.skip_word();
    }
    assert_eq!(session.prompt().hint, "PEUBG or PEUBG/KHUR");

    // PEUBG alone already completes the one-stroke alternative.
    for key in ["e", "n", "m", "j", "k"] {
        run_qwerty(&mut session, &mut sim, key, true, &mut all);
    }
    for key in ["e", "n", "m", "j", "k"] {
        run_qwerty(&mut session, &mut sim, key, false, &mut all);
    }
    assert_eq!(completed_words(&all), vec!["pick"]);
    all.clear();

    // A stray star on "quick".
    run_qwerty(&mut session, &mut sim, "t", true, &mut all);
    run_qwerty(&mut session, &mut sim, "t", false, &mut all);
    assert!(all
        .iter()
        .any(|u| matches!(u, SessionUpdate::Missed { .. })));
    assert_eq!(session.current_entry().word(), "quick");
    assert_eq!(session.streak(), 0);
}
