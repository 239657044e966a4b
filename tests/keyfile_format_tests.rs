use serde::{Deserialize, Serialize};
use serde_keyfile::{
    from_str, from_str_with_options, to_string, to_string_with_options, Document, Error,
    KeyFileOptions, SyntaxErrorKind, Value,
};
use std::collections::{BTreeMap, HashMap};

// Lines

#[test]
fn test_comments_and_blank_lines_are_skipped() {
    let doc = Document::parse("# header\n\n[a]\n  # indented comment\nk = v\n\n").unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.get("a", "k", ""), Some("v"));
    assert_eq!(doc.entries().count(), 1);
}

#[test]
fn test_byte_order_mark_is_ignored() {
    let doc = Document::parse("\u{feff}[a]\nk = v").unwrap();
    assert_eq!(doc.get("a", "k", ""), Some("v"));
}

#[test]
fn test_crlf_line_endings() {
    let doc = Document::parse("[a]\r\nk = v\r\nn = 1\r\n").unwrap();
    assert_eq!(doc.get("a", "k", ""), Some("v"));
    assert_eq!(doc.get("a", "n", ""), Some("1"));
}

#[test]
fn test_value_split_at_first_equals() {
    let doc = Document::parse("[a]\nExec = env A=1 B=2 app").unwrap();
    assert_eq!(doc.get("a", "Exec", ""), Some("env A=1 B=2 app"));
}

#[test]
fn test_group_name_is_trimmed_and_may_contain_spaces() {
    let doc = Document::parse("[ Desktop Entry ]\nName = Editor").unwrap();
    assert_eq!(doc.get("Desktop Entry", "Name", ""), Some("Editor"));
}

#[test]
fn test_reopened_group_accumulates_keys() {
    let doc = Document::parse("[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3\nx = 4").unwrap();
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.get("a", "x", ""), Some("4"));
    assert_eq!(doc.get("a", "z", ""), Some("3"));
}

#[test]
fn test_subkeys_split_at_last_bracket() {
    let doc = Document::parse("[a]\nName[sr@latin] = Urednik\nOdd[x][y] = 1").unwrap();
    assert_eq!(doc.get("a", "Name", "sr@latin"), Some("Urednik"));
    assert_eq!(doc.get("a", "Odd[x]", "y"), Some("1"));
}

#[test]
fn test_entries_report_lines() {
    let doc = Document::parse("[a]\n\nName = x\nName[de] = y").unwrap();
    let lines: Vec<(&str, usize)> = doc.entries().map(|e| (e.subkey, e.line)).collect();
    assert_eq!(lines, vec![("", 3), ("de", 4)]);
}

#[test]
fn test_syntax_errors() {
    let cases = [
        ("key = 1", 1, SyntaxErrorKind::KeyOutsideGroup),
        ("[a]\n[ ]", 2, SyntaxErrorKind::EmptyGroupName),
        ("[a]\njust text", 2, SyntaxErrorKind::MissingEquals),
        ("[a]\nk = 1\n = 2", 3, SyntaxErrorKind::EmptyKey),
    ];
    for (src, expected_line, expected_kind) in cases {
        match Document::parse(src) {
            Err(Error::Syntax { line, kind, .. }) => {
                assert_eq!(line, expected_line, "line for {:?}", src);
                assert_eq!(kind, expected_kind, "kind for {:?}", src);
            }
            other => panic!("expected syntax error for {:?}, got {:?}", src, other),
        }
    }
}

#[test]
fn test_syntax_error_reaches_typed_decode() {
    #[derive(Deserialize, Debug)]
    struct Model {
        #[allow(dead_code)]
        a: HashMap<String, String>,
    }

    let err = from_str::<Model>("key = 1").unwrap_err();
    assert_eq!(err.line(), Some(1));
    assert!(matches!(
        err,
        Error::Syntax {
            kind: SyntaxErrorKind::KeyOutsideGroup,
            ..
        }
    ));
}

// Escaping

#[test]
fn test_escapes_decode() {
    let doc = Document::parse("[a]\nk = \\sa\\tb\\nc\\rd\\s\nw = C:\\Windows\\x").unwrap();
    assert_eq!(doc.get("a", "k", ""), Some(" a\tb\nc\rd "));
    assert_eq!(doc.get("a", "w", ""), Some("C:\\Windows\\x"));
}

#[test]
fn test_document_escapes_on_output() {
    let mut doc = Document::new();
    doc.insert("a", "k", "", "  two\nlines ");
    assert_eq!(doc.to_string(), "[a]\nk=\\s\\stwo\\nlines\\s\n");
    let back = Document::parse(&doc.to_string()).unwrap();
    assert_eq!(back.get("a", "k", ""), Some("  two\nlines "));
}

// Output

#[test]
fn test_output_is_sorted() {
    let mut doc = Document::new();
    doc.insert("zeta", "b", "", "2");
    doc.insert("zeta", "a", "", "1");
    doc.insert("alpha", "k", "fr", "bonjour");
    doc.insert("alpha", "k", "", "hello");
    doc.insert("alpha", "k", "de", "hallo");
    assert_eq!(
        doc.to_string(),
        "[alpha]\nk=hello\nk[de]=hallo\nk[fr]=bonjour\n\n[zeta]\na=1\nb=2\n"
    );
}

#[test]
fn test_pretty_output() {
    let mut doc = Document::new();
    doc.insert("a", "k", "", "v");
    doc.insert("a", "empty", "", "");
    assert_eq!(
        doc.to_string_with_options(&KeyFileOptions::pretty()),
        "[a]\nempty =\nk = v\n"
    );
}

#[test]
fn test_empty_document_renders_empty() {
    assert_eq!(Document::new().to_string(), "");
}

// Typed scenarios

#[test]
fn test_greet_map_roundtrip() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Example {
        greet: BTreeMap<String, String>,
    }
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct File {
        example: Example,
    }

    let src = "[example]\ngreet = hello\ngreet[tr] = merhaba\ngreet[de] = hallo\n\
               greet[it] = ciao\ngreet[fr] = bonjour\n";
    let file: File = from_str(src).unwrap();
    assert_eq!(file.example.greet.len(), 5);
    assert_eq!(file.example.greet[""], "hello");
    assert_eq!(file.example.greet["tr"], "merhaba");
    assert_eq!(
        to_string(&file).unwrap(),
        "[example]\ngreet=hello\ngreet[de]=hallo\ngreet[fr]=bonjour\ngreet[it]=ciao\ngreet[tr]=merhaba\n"
    );
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Separated {
    default: Vec<i32>,
    #[serde(rename = "commas,sep=,")]
    commas: Vec<i32>,
    #[serde(rename = "arrows,sep=->")]
    arrows: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SeparatedFile {
    lists: Separated,
}

#[test]
fn test_list_separators() {
    let file: SeparatedFile =
        from_str("[lists]\ndefault = 1;2;3\ncommas = 4, 5 ,6\narrows = a->b->c").unwrap();
    assert_eq!(
        file.lists,
        Separated {
            default: vec![1, 2, 3],
            commas: vec![4, 5, 6],
            arrows: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        }
    );
    assert_eq!(
        to_string(&file).unwrap(),
        "[lists]\narrows=a->b->c\ncommas=4,5,6\ndefault=1;2;3\n"
    );
}

#[test]
fn test_escaped_separator_is_part_of_item() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Lists {
        items: Vec<String>,
    }
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct File {
        lists: Lists,
    }

    let file: File = from_str("[lists]\nitems = a\\;b;c").unwrap();
    assert_eq!(file.lists.items, vec!["a;b", "c"]);
    assert_eq!(to_string(&file).unwrap(), "[lists]\nitems=a\\;b;c\n");
}

#[test]
fn test_trailing_separator_yields_empty_item() {
    #[derive(Deserialize, Debug)]
    struct Entry {
        #[serde(rename = "Keywords")]
        keywords: Vec<String>,
    }
    #[derive(Deserialize, Debug)]
    struct File {
        #[serde(rename = "Desktop Entry")]
        entry: Entry,
    }

    let file: File = from_str("[Desktop Entry]\nKeywords = text;edit;").unwrap();
    assert_eq!(file.entry.keywords, vec!["text", "edit", ""]);
}

#[test]
fn test_empty_value_is_empty_list() {
    #[derive(Deserialize, Debug)]
    struct Lists {
        items: Vec<u8>,
    }
    #[derive(Deserialize, Debug)]
    struct File {
        lists: Lists,
    }

    let file: File = from_str("[lists]\nitems =").unwrap();
    assert!(file.lists.items.is_empty());
}

#[test]
fn test_default_separator_from_options() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Lists {
        items: Vec<u8>,
        #[serde(rename = "pinned,sep=;")]
        pinned: Vec<u8>,
    }
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct File {
        lists: Lists,
    }

    let options = KeyFileOptions::new().with_separator("|");
    let file: File = from_str_with_options("[lists]\nitems = 1|2\npinned = 3;4", &options).unwrap();
    assert_eq!(file.lists.items, vec![1, 2]);
    assert_eq!(file.lists.pinned, vec![3, 4]);
    assert_eq!(
        to_string_with_options(&file, &options).unwrap(),
        "[lists]\nitems=1|2\npinned=3;4\n"
    );
}

#[test]
fn test_omitempty_skips_zero_values() {
    #[derive(Serialize)]
    struct Group {
        #[serde(rename = "icon,omitempty")]
        icon: Option<String>,
        #[serde(rename = "count,omitempty")]
        count: u32,
        #[serde(rename = "flag,omitempty")]
        flag: bool,
        #[serde(rename = "tags,omitempty")]
        tags: Vec<String>,
        #[serde(rename = "names,omitempty")]
        names: HashMap<String, String>,
        always: u32,
    }
    #[derive(Serialize)]
    struct File {
        group: Group,
    }

    let file = File {
        group: Group {
            icon: None,
            count: 0,
            flag: false,
            tags: Vec::new(),
            names: HashMap::new(),
            always: 0,
        },
    };
    assert_eq!(to_string(&file).unwrap(), "[group]\nalways=0\n");
}

#[test]
fn test_omitempty_keeps_nonzero_values() {
    #[derive(Serialize)]
    struct Group {
        #[serde(rename = "icon,omitempty")]
        icon: Option<String>,
        #[serde(rename = "count,omitempty")]
        count: u32,
    }
    #[derive(Serialize)]
    struct File {
        group: Group,
    }

    let file = File {
        group: Group {
            icon: Some(String::new()),
            count: 2,
        },
    };
    assert_eq!(to_string(&file).unwrap(), "[group]\ncount=2\nicon=\n");
}

#[test]
fn test_bool_is_case_insensitive() {
    #[derive(Deserialize, Debug)]
    struct Flags {
        a: bool,
        b: bool,
        c: bool,
    }
    #[derive(Deserialize, Debug)]
    struct File {
        flags: Flags,
    }

    let file: File = from_str("[flags]\na = True\nb = fAlSe\nc = TRUE").unwrap();
    assert!(file.flags.a);
    assert!(!file.flags.b);
    assert!(file.flags.c);

    let err = from_str::<File>("[flags]\na = yes").unwrap_err();
    assert!(matches!(err, Error::Conversion { ref key, line: 2, .. } if key == "a"));
}

#[test]
fn test_any_precedence() {
    let cases = [
        ("7", Value::Integer(7)),
        ("-7", Value::Integer(-7)),
        ("7.0", Value::Float(7.0)),
        ("1e3", Value::Float(1000.0)),
        ("TRUE", Value::Bool(true)),
        ("2i", Value::Complex(num_complex::Complex64::new(0.0, 2.0))),
        ("(1-1i)", Value::Complex(num_complex::Complex64::new(1.0, -1.0))),
        ("seven", Value::String("seven".to_string())),
        ("", Value::String(String::new())),
    ];
    for (raw, expected) in cases {
        assert_eq!(Value::infer(raw), expected, "inferring {:?}", raw);
    }
}

#[test]
fn test_root_map_mode() {
    let file: BTreeMap<String, BTreeMap<String, Value>> =
        from_str("[b]\nx = 1\n[a]\ny = text").unwrap();
    assert_eq!(file["a"]["y"], Value::String("text".to_string()));
    assert_eq!(file["b"]["x"], Value::Integer(1));
    assert_eq!(to_string(&file).unwrap(), "[a]\ny=text\n\n[b]\nx=1\n");
}

#[test]
fn test_invalid_directive_is_reported() {
    #[derive(Deserialize, Debug)]
    struct Group {
        #[serde(rename = "value,bogus")]
        #[allow(dead_code)]
        value: u8,
    }
    #[derive(Deserialize, Debug)]
    struct File {
        #[allow(dead_code)]
        group: Group,
    }

    assert!(matches!(
        from_str::<File>("[group]\nvalue = 1"),
        Err(Error::InvalidTag { .. })
    ));
}
