use super::extract;

#[test]
fn concatenates_only_fenced_blocks_in_the_tagged_language() {
    let markdown = "\
Intro text, ignored.

```forest
S -> a # trailing comment
```

Some prose in between.

```other
ignored entirely
```

```forest
| b ;
```
";
    let source = extract(markdown, "forest");
    assert_eq!(source, "S -> a \n| b ;\n");
}

#[test]
fn escape_protects_the_next_character_from_comment_meaning() {
    let markdown = "```forest\na %!# b # real comment\n```\n";
    let source = extract(markdown, "forest");
    assert_eq!(source, "a # b \n");
}

#[test]
fn normalizes_crlf_to_lf() {
    let markdown = "```forest\r\nS -> a ;\r\n```\r\n";
    let source = extract(markdown, "forest");
    assert_eq!(source, "S -> a ;\n");
}
