use docflow::{Info, PageGeometry, PdfBackend, Session};

fn main() {
    let mut args = std::env::args().skip(1);
    let regular = args
        .next()
        .expect("usage: grant-report <regular.ttf> [bold.ttf] [italic.ttf]");
    let regular = std::fs::read(regular).expect("can read regular font");

    let mut backend = PdfBackend::new(regular).expect("can parse regular font");
    if let Some(bold) = args.next() {
        let bold = std::fs::read(bold).expect("can read bold font");
        backend = backend.with_bold(bold).expect("can parse bold font");
    }
    if let Some(italic) = args.next() {
        let italic = std::fs::read(italic).expect("can read italic font");
        backend = backend.with_italic(italic).expect("can parse italic font");
    }
    backend = backend.with_info(
        Info::new()
            .title("Community Garden Expansion")
            .author("Riverbend Neighbourhood Association")
            .subject("Grant Application")
            .clone(),
    );

    let mut session = Session::open(
        backend,
        PageGeometry::letter(),
        "Community Garden Expansion",
        Some("Grant application, 2026 funding cycle"),
    );

    session.section_title("Project Summary");
    session.paragraph(&lipsum::lipsum(120));

    session.section_title("Goals");
    session.subsection_title("Primary objectives");
    session.list([
        "Double the number of available garden plots",
        "Install an accessible raised-bed area",
        "Extend the drip irrigation system to the new plots",
    ]);
    session.subsection_title("Secondary objectives");
    session.paragraph(&lipsum::lipsum(60));

    session.section_title("Budget");
    let header = ["Item", "Quantity", "Cost"];
    let rows: Vec<Vec<String>> = vec![
        vec!["Lumber for raised beds".into(), "24".into(), "$1,920".into()],
        vec!["Soil and compost".into(), "18 yd³".into(), "$990".into()],
        vec!["Irrigation supplies".into(), "1 lot".into(), "$740".into()],
        vec!["Tool shed".into(), "1".into(), "$1,350".into()],
    ];
    session.table(&header, &rows);

    session.section_title("Timeline");
    session.paragraph(&lipsum::lipsum(80));

    // blank content renders as a placeholder
    session.minor_title("Prior awards");
    session.paragraph("");

    // omitted entirely when the content is blank
    session.conditional_section("Letters of support", lipsum::lipsum(40));
    session.conditional_section("Appendices", "");

    let mut out = std::fs::File::create("grant-report.pdf").expect("can create output file");
    session.emit(&mut out).expect("can write document");
}
