use mayaff_core::config::{MayaFlagsConfig, default_modules, parse_module_list};
use mayaff_core::{Error, format_source};

fn config() -> MayaFlagsConfig {
    MayaFlagsConfig::embedded("2018", default_modules()).expect("embedded 2018 config")
}

fn format(source: &str) -> String {
    format_source(source, &config()).expect("format")
}

#[test]
fn rewrites_flags_and_nested_target_call() {
    let source = r#"
from maya import cmds
f = (
    "hahha"
)

cmds.delete(
    source,
    ch=function(hi="help"),
    at =cmds.trim(n = "hello")
)
"#;
    let expected = r#"
from maya import cmds
f = (
    "hahha"
)

cmds.delete(
    source,
    constructionHistory=function(hi="help"),
    attribute =cmds.trim(name = "hello")
)
"#;
    assert_eq!(format(source), expected);
}

#[test]
fn single_line_comment_is_untouched() {
    let source = "\nfrom maya import cmds\n#cmds.delete(source, ch=function(hi=\"help\"))\n";
    assert_eq!(format(source), source);
}

#[test]
fn comment_inside_call_is_untouched() {
    let source = r#"
from maya import cmds as fgh
fgh.cMuscleWeightPrune(
    pr=True, # cmds.delete(source, ch=function(hi="help"))
    wt=3
)
"#;
    let expected = r#"
from maya import cmds as fgh
fgh.cMuscleWeightPrune(
    prune=True, # cmds.delete(source, ch=function(hi="help"))
    weight=3
)
"#;
    assert_eq!(format(source), expected);
}

#[test]
fn string_literal_is_untouched() {
    let source = "
from maya import cmds
'''
#
cmds.delete(source, ch=function(hi=\"help\"))
'''
";
    assert_eq!(format(source), source);
}

#[test]
fn aliased_import_is_recognized() {
    let source = "\nimport maya.cmds as taco\ntaco.textureWindow(source, itn=\"t\")\n";
    let expected = "\nimport maya.cmds as taco\ntaco.textureWindow(source, imageToTextureNumber=\"t\")\n";
    assert_eq!(format(source), expected);
}

#[test]
fn only_matching_imports_bind_names() {
    // `cmds` here comes from `abc`, not `maya`, so `cmds.volumeBind` stays;
    // the fully dotted access path is still rewritten.
    let source = r#"
import maya.cmds
from abc import cmds
cmds.volumeBind(q=True)
maya.cmds.textureWindow(source, itn="t")
"#;
    let expected = r#"
import maya.cmds
from abc import cmds
cmds.volumeBind(q=True)
maya.cmds.textureWindow(source, imageToTextureNumber="t")
"#;
    assert_eq!(format(source), expected);
}

#[test]
fn shared_prefix_import_does_not_confuse_path_matching() {
    let source = r#"
import maya.asdf
import maya.cmds
from abc import cmds
cmds.volumeBind(q=True)
maya.cmds.textureWindow(source, ra="t")
"#;
    let expected = r#"
import maya.asdf
import maya.cmds
from abc import cmds
cmds.volumeBind(q=True)
maya.cmds.textureWindow(source, removeAllImages="t")
"#;
    assert_eq!(format(source), expected);
}

#[test]
fn nested_target_calls_inside_tuple_argument() {
    let source = r#"
from maya import cmds as abc

abc.textureWindow(source, ra=(
    abc.about(ppc=True),
    abc.about(li=True),
))
"#;
    let expected = r#"
from maya import cmds as abc

abc.textureWindow(source, removeAllImages=(
    abc.about(macOSppc=True),
    abc.about(linux=True),
))
"#;
    assert_eq!(format(source), expected);
}

#[test]
fn python2_source_raises_parse_failure() {
    let source = r#"
from maya import cmds as abc
print "hello"

abc.textureWindow(source, ra=(
    abc.about(ppc=True),
    abc.about(li=True),
))
"#;
    let err = format_source(source, &config()).expect_err("python 2 source");
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn custom_module_pairs_are_honored() {
    let source = "\nfrom ABC.maya2 import abc\n\nabc.textureWindow(source, ra=True)\n";
    let expected = "\nfrom ABC.maya2 import abc\n\nabc.textureWindow(source, removeAllImages=True)\n";
    let modules = parse_module_list("ABC.maya2:abc").expect("modules");
    let config = MayaFlagsConfig::embedded("2018", modules).expect("config");
    assert_eq!(format_source(source, &config).expect("format"), expected);
}

#[test]
fn unmapped_short_name_is_left_unchanged() {
    let source = "from maya import cmds\ncmds.delete(zz=True, ch=True)\n";
    let expected = "from maya import cmds\ncmds.delete(zz=True, constructionHistory=True)\n";
    assert_eq!(format(source), expected);
}

#[test]
fn consecutive_target_calls_are_both_rewritten() {
    let source = "from maya import cmds\ncmds.delete(ch=True)\ncmds.trim(n=\"x\")\n";
    let expected =
        "from maya import cmds\ncmds.delete(constructionHistory=True)\ncmds.trim(name=\"x\")\n";
    assert_eq!(format(source), expected);
}

#[test]
fn rewriting_is_idempotent() {
    let source = r#"
from maya import cmds
cmds.delete(source, ch=True)
cmds.textureWindow(source, ra=(cmds.about(ppc=True),))
"#;
    let once = format(source);
    assert_ne!(once, source);
    assert_eq!(format(&once), once);
}

#[test]
fn flags_of_non_target_nested_call_stay_short() {
    let source = "from maya import cmds\ncmds.delete(ch=other_func(n=1))\n";
    let expected = "from maya import cmds\ncmds.delete(constructionHistory=other_func(n=1))\n";
    assert_eq!(format(source), expected);
}

#[test]
fn crlf_line_endings_survive() {
    let source = "from maya import cmds\r\ncmds.delete(ch=True)\r\n";
    let expected = "from maya import cmds\r\ncmds.delete(constructionHistory=True)\r\n";
    assert_eq!(format(source), expected);
}
