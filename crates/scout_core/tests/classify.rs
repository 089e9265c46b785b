use scout_core::{ExtensionTable, ItemKind, MediaFilter};

#[test]
fn media_table_matches_case_insensitively() {
    let table = ExtensionTable::media(MediaFilter::All);
    assert_eq!(table.classify("HOLIDAY.JPG"), Some(ItemKind::Image));
    assert_eq!(table.classify("clip.Mp4"), Some(ItemKind::Video));
    assert_eq!(table.classify("movie.3gp"), Some(ItemKind::Video));
    assert_eq!(table.classify("notes.txt"), None);
}

#[test]
fn media_filter_restricts_kinds() {
    let images = ExtensionTable::media(MediaFilter::Image);
    assert_eq!(images.classify("a.png"), Some(ItemKind::Image));
    assert_eq!(images.classify("a.mkv"), None);

    let videos = ExtensionTable::media(MediaFilter::Video);
    assert_eq!(videos.classify("a.png"), None);
    assert_eq!(videos.classify("a.mkv"), Some(ItemKind::Video));
}

#[test]
fn document_sub_kinds() {
    let table = ExtensionTable::documents();
    assert_eq!(table.classify("cv.docx"), Some(ItemKind::Word));
    assert_eq!(table.classify("budget.XLS"), Some(ItemKind::Excel));
    assert_eq!(table.classify("deck.pptx"), Some(ItemKind::PowerPoint));
    assert_eq!(table.classify("paper.pdf"), Some(ItemKind::Pdf));
    assert_eq!(table.classify("photo.png"), None);
}

#[test]
fn first_matching_row_wins() {
    let table = ExtensionTable::new()
        .with_kind(ItemKind::Pdf, ["pdf"])
        .with_kind(ItemKind::Word, ["pdf", "doc"]);
    assert_eq!(table.classify("x.pdf"), Some(ItemKind::Pdf));
    assert_eq!(table.classify("x.doc"), Some(ItemKind::Word));
}

#[test]
fn url_suffix_defaults_to_link() {
    assert_eq!(
        ExtensionTable::classify_url("http://x.example/a/photo.PNG"),
        ItemKind::Image
    );
    assert_eq!(
        ExtensionTable::classify_url("https://cdn.example/v/intro.webm"),
        ItemKind::Video
    );
    assert_eq!(
        ExtensionTable::classify_url("https://example.com/about"),
        ItemKind::Link
    );
}
