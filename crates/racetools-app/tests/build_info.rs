//! Build ID stamped by build.rs: YYYY.MM.DD+g<short-sha>

#[test]
fn test_build_id_format() {
    let build_id = env!("RACETOOLS_BUILD_ID");
    println!("Build ID: {}", build_id);

    let (date, git) = build_id
        .split_once('+')
        .expect("date and git parts separated by +");

    let date_pieces: Vec<&str> = date.split('.').collect();
    assert_eq!(date_pieces.len(), 3, "date should be YYYY.MM.DD");
    assert_eq!(date_pieces[0].len(), 4);
    date_pieces[0].parse::<u16>().expect("numeric year");

    let month: u8 = date_pieces[1].parse().expect("numeric month");
    assert!((1..=12).contains(&month));
    let day: u8 = date_pieces[2].parse().expect("numeric day");
    assert!((1..=31).contains(&day));

    let sha = git.strip_prefix('g').expect("git part starts with g");
    // Builds outside a checkout fall back to "unknown"
    assert!(
        sha == "unknown" || (!sha.is_empty() && sha.chars().all(|c| c.is_ascii_hexdigit())),
        "unexpected sha {sha}"
    );
}
