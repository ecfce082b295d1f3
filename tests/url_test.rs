use weburl::{Error, Query, Url};

#[test]
fn parse_empty_is_falsy() {
    let u = Url::parse("").unwrap();
    assert!(u.is_empty());
    assert_eq!(u.to_string(), "");
    assert!(!u.absolute());
    assert_eq!(u, Url::default());
}

#[test]
fn round_trip_stability() {
    for s in [
        "http://example.com/a/b?x=1#f",
        "https://u:p@example.com:8443/a/b/",
        "mailto:a@b.com",
        "//other/y",
        "a/b?q#f",
        "http://h/%2Fseg1/seg2",
    ] {
        let once = Url::parse(s).unwrap();
        let twice = Url::parse(&once.to_string()).unwrap();
        assert_eq!(once, twice, "not stable for {s:?}");
        assert_eq!(once.to_string(), twice.to_string());
    }
}

#[test]
fn idna_and_percent_encoding_scenario() {
    // Spec scenario 1.
    let u = Url::parse("http://εμπορικόσήμα.eu/путь/這裡").unwrap();
    assert_eq!(
        u.to_string(),
        "http://xn--jxagkqfkduily1i.eu/%D0%BF%D1%83%D1%82%D1%8C/%E9%80%99%E8%A3%A1"
    );
    assert_eq!(u.human_repr(), "http://εμπορικόσήμα.eu/путь/這裡");
}

#[test]
fn default_port_elision_scenario() {
    // Spec scenario 2.
    let u = Url::parse("http://example.com").unwrap().with_port(Some(80)).unwrap();
    assert_eq!(u.to_string(), "http://example.com");
    assert_eq!(u.explicit_port(), None);
    assert_eq!(u.port(), Some(80));
}

#[test]
fn non_default_port_is_kept() {
    let u = Url::parse("http://example.com").unwrap().with_port(Some(8080)).unwrap();
    assert_eq!(u.to_string(), "http://example.com:8080");
    assert_eq!(u.explicit_port(), Some(8080));
}

#[test]
fn with_port_is_idempotent_on_the_effective_port() {
    let u = Url::parse("http://example.com:8080/").unwrap();
    let again = u.with_port(u.port()).unwrap();
    assert_eq!(again.port(), u.port());
}

#[test]
fn reference_resolution_scenario() {
    // Spec scenario 3.
    let base = Url::parse("http://example.com/a").unwrap();
    assert_eq!(
        base.join(&Url::parse("b/c").unwrap()).unwrap().to_string(),
        "http://example.com/a/b/c"
    );
    assert_eq!(
        base.join(&Url::parse("/x").unwrap()).unwrap().to_string(),
        "http://example.com/x"
    );
    assert_eq!(
        base.join(&Url::parse("//other/y").unwrap()).unwrap().to_string(),
        "http://other/y"
    );
    assert_eq!(
        base.join(&Url::parse("./https://github.com/").unwrap())
            .unwrap()
            .to_string(),
        "http://example.com/https://github.com/"
    );
}

#[test]
fn query_mutation_scenario() {
    // Spec scenario 4.
    let u = Url::parse("http://h/?a=b&b=1").unwrap();
    let mut update = Query::new();
    update.push("b", "2");
    assert_eq!(u.update_query(&update).unwrap().to_string(), "http://h/?a=b&b=2");

    let mut extend = Query::new();
    extend.push("b", "2");
    assert_eq!(
        u.extend_query(&extend).unwrap().to_string(),
        "http://h/?a=b&b=1&b=2"
    );

    let mut rem = Query::new();
    rem.push("c", "d");
    assert_eq!((&u % &rem).unwrap().to_string(), "http://h/?a=b&b=1&c=d");

    // `%` aliases `update_query`, so a touched key is replaced, not duplicated.
    let mut rem_b = Query::new();
    rem_b.push("b", "9");
    assert_eq!((&u % &rem_b).unwrap().to_string(), "http://h/?a=b&b=9");
}

#[test]
fn percent_2f_path_decoding_scenario() {
    // Spec scenario 5.
    let u = Url::parse("http://h/%2Fseg1/seg2").unwrap();
    assert_eq!(u.path(), "//seg1/seg2");
    assert_eq!(u.path_safe(), "/%2Fseg1/seg2");
    assert_eq!(u.raw_path(), "/%2Fseg1/seg2");
}

#[test]
fn joinpath_append_segment() {
    let base = Url::parse("http://example.com/a").unwrap();
    let joined = (&base / "b c").unwrap();
    assert_eq!(joined.to_string(), "http://example.com/a/b%20c");
    assert_eq!(joined.parts().last().unwrap(), "b c");
    // dropped query/fragment on join
    let with_qf = Url::parse("http://example.com/a?x=1#f").unwrap();
    assert_eq!((&with_qf / "b").unwrap().to_string(), "http://example.com/a/b");
}

#[test]
fn joinpath_multi_segment() {
    let base = Url::parse("http://example.com/a").unwrap();
    let joined = base.joinpath(&["b", "c"], false).unwrap();
    assert_eq!(joined.to_string(), "http://example.com/a/b/c");
}

#[test]
fn origin_and_relative() {
    let u = Url::parse("http://u:p@example.com:8080/a/b?x=1#f").unwrap();
    let origin = u.origin().unwrap();
    assert_eq!(origin.to_string(), "http://example.com:8080");
    assert!(origin.user().is_none());
    assert!(origin.path() == "" || origin.path() == "/");

    let rel = u.relative();
    assert_eq!(rel.to_string(), "/a/b?x=1#f");
}

#[test]
fn origin_requires_host() {
    let u = Url::parse("mailto:a@b.com").unwrap();
    assert!(matches!(u.origin(), Err(Error::InvalidArgument { .. })));
}

#[test]
fn origin_of_protocol_relative_url_has_no_scheme() {
    // A scheme-less, protocol-relative URL is still `absolute()`, so `origin()` must
    // accept it, copying the (absent) scheme through rather than rejecting it.
    let u = Url::parse("//other/y").unwrap();
    let origin = u.origin().unwrap();
    assert_eq!(origin.to_string(), "//other");
    assert_eq!(origin.scheme(), "");
}

#[test]
fn dot_segments_are_absorbed_beyond_root() {
    let u = Url::parse("http://h/../a").unwrap();
    assert_eq!(u.raw_path(), "/a");
    let u2 = Url::parse("http://h/..").unwrap();
    assert_eq!(u2.raw_path(), "/");
}

#[test]
fn builder_port_zero_is_rejected() {
    let err = Url::builder().scheme("http").host(Some("h")).port(0).build();
    assert!(matches!(err, Err(Error::InvalidArgument { .. })));
}

#[test]
fn builder_rejects_authority_mixed_with_host() {
    let err = Url::builder()
        .scheme("http")
        .authority("h")
        .host(Some("other"))
        .build();
    assert!(matches!(err, Err(Error::InvalidArgument { .. })));
}

#[test]
fn builder_rejects_query_and_query_string_together() {
    let err = Url::builder()
        .scheme("http")
        .host(Some("h"))
        .query(Query::new())
        .query_string("a=b")
        .build();
    assert!(matches!(err, Err(Error::AmbiguousQuery)));
}

#[test]
fn builder_rejects_host_none_with_port() {
    let err = Url::builder()
        .scheme("file")
        .host(None::<&str>)
        .port(80)
        .build();
    assert!(matches!(err, Err(Error::InvalidArgument { .. })));
}

#[test]
fn with_host_rejects_on_relative_url() {
    let u = Url::parse("a/b").unwrap();
    assert!(matches!(u.with_host(Some("h")), Err(Error::InvalidArgument { .. })));
}

#[test]
fn with_scheme_permits_hostless_schemes_on_relative_url() {
    let u = Url::parse("a/b").unwrap();
    let m = u.with_scheme("mailto").unwrap();
    assert_eq!(m.scheme(), "mailto");
}

#[test]
fn with_scheme_rejects_host_requiring_scheme_on_relative_url() {
    let u = Url::parse("a/b").unwrap();
    assert!(matches!(u.with_scheme("http"), Err(Error::InvalidArgument { .. })));
}

#[test]
fn with_name_and_with_suffix_clear_query_and_fragment() {
    let u = Url::parse("http://h/a/b.txt?x=1#f").unwrap();
    let renamed = u.with_name("c.txt").unwrap();
    assert_eq!(renamed.to_string(), "http://h/a/c.txt");
    let resuffixed = u.with_suffix(".md").unwrap();
    assert_eq!(resuffixed.to_string(), "http://h/a/b.md");
}

#[test]
fn suffix_and_suffixes() {
    let u = Url::parse("http://h/a/archive.tar.gz").unwrap();
    assert_eq!(u.suffix(), ".gz");
    assert_eq!(u.suffixes(), vec![".tar", ".gz"]);
    let dotfile = Url::parse("http://h/a/.bashrc").unwrap();
    assert_eq!(dotfile.suffix(), "");
}

#[test]
fn parent_pops_segment_and_clears_query_fragment() {
    let u = Url::parse("http://h/a/b/c?x=1#f").unwrap();
    let p = u.parent();
    assert_eq!(p.to_string(), "http://h/a/b");
}

#[test]
fn equality_and_ordering_are_over_canonical_string() {
    let a = Url::parse("http://h/a").unwrap();
    let b = Url::parse("http://h/b").unwrap();
    assert!(a < b);
    assert_ne!(a, b);
    assert_eq!(a, Url::parse("http://h/a").unwrap());
}

#[test]
fn human_repr_is_lossy_decoded_view() {
    let u = Url::parse("http://h/a%20b?x=c+d#f%20g").unwrap();
    assert_eq!(u.human_repr(), "http://h/a b?x=c d#f g");
}

#[test]
fn parse_encoded_skips_requoting_but_validates() {
    let u = Url::parse_encoded("http://h/a%2Fb").unwrap();
    assert_eq!(u.raw_path(), "/a%2Fb");
    assert!(matches!(
        Url::parse_encoded("http://h/a%2"),
        Err(Error::MalformedPercent { .. })
    ));
}

#[cfg(feature = "serde")]
#[test]
fn serde_round_trips_through_the_canonical_string() {
    let u = Url::parse("http://h/a?x=1").unwrap();
    let json = serde_json::to_string(&u).unwrap();
    assert_eq!(json, "\"http://h/a?x=1\"");
    let back: Url = serde_json::from_str(&json).unwrap();
    assert_eq!(back, u);
}
