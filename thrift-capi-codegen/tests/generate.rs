//! End-to-end generation from schema documents.

use thrift_capi_codegen::{
    CodegenError, GeneratorOptions, WriteStatus, generate_from_file, generate_from_xml,
    generate_from_xml_with_options,
};

const GEOMETRY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<idl>
  <document name="geometry">
    <namespace name="cpp" value="ns"/>
    <namespace name="csharp" value="Geometry.Interop"/>
    <typedef name="Coord" type="i32"/>
    <typedef name="Distance" type="id" type-id="Coord"/>
    <enum name="Color" doc="Fill colors">
      <member name="RED" value="3"/>
      <member name="GREEN" value="1"/>
      <member name="BLUE" value="42"/>
    </enum>
    <const name="ORIGIN_X" type="i32"><int>0</int></const>
    <struct name="Point">
      <field field-id="1" name="x" type="i32"/>
      <field field-id="2" name="y" type="i32"/>
    </struct>
    <struct name="Caption">
      <field field-id="1" name="text" type="string"/>
      <field field-id="2" name="font" type="string"/>
    </struct>
    <struct name="Shape" doc="A named, colored shape">
      <field field-id="4" name="color" type="id" type-id="Color"/>
      <field field-id="1" name="name" type="string"/>
      <field field-id="2" name="origin" type="id" type-id="Point"/>
      <field field-id="3" name="caption" type="id" type-id="Caption"/>
      <field field-id="5" name="width" type="id" type-id="Distance"/>
    </struct>
    <service name="Svc" doc="Shape service">
      <method name="Echo" doc="Returns its input">
        <returns type="string"/>
        <arg field-id="1" name="msg" type="string"/>
      </method>
      <method name="move">
        <returns type="id" type-id="Point"/>
        <arg field-id="1" name="p" type="id" type-id="Point"/>
        <arg field-id="2" name="dx" type="id" type-id="Distance"/>
      </method>
      <method name="recolor">
        <returns type="id" type-id="Color"/>
        <arg field-id="1" name="shape" type="id" type-id="Shape"/>
      </method>
      <method name="ping" oneway="true">
        <returns type="void"/>
      </method>
    </service>
  </document>
</idl>
"#;

#[test]
fn test_point_struct_and_free_function() {
    let files = generate_from_xml(GEOMETRY).expect("Failed to generate");
    let h = &files.header.contents;

    assert!(h.contains("typedef struct _ns_Point\n{\n\tint32_t x;\n\tint32_t y;\n} ns_Point;\n"));
    assert!(h.contains("THRIFT_C_API_DLLEXPORT void ns_Point_free_memory(ns_Point* value);\n"));
    assert!(h.contains("THRIFT_C_API_DLLEXPORT void ns_string_free_memory(char* value);\n"));
    assert!(files.source.contents.contains("void ns_Point_free_memory(ns_Point* value)\n{\n"));
}

#[test]
fn test_echo_exported_function() {
    let files = generate_from_xml(GEOMETRY).expect("Failed to generate");
    let h = &files.header.contents;
    let cpp = &files.source.contents;

    assert!(h.contains("THRIFT_C_API_DLLEXPORT char* ns_svc_echo(char* msg);\n"));
    let body_start = cpp.find("char* ns_svc_echo(char* msg)\n{\n").expect("echo body");
    let body = &cpp[body_start..];
    let copy_in = body.find("cpp_msg = std::string(msg);").expect("copy in");
    let call = body.find("_handler->Echo(_cpp_result,").expect("call");
    let alloc = body
        .find("_result = (char*)malloc(_cpp_result.size() + 1);")
        .expect("alloc");
    let copy_out = body
        .find("memcpy(_result, _cpp_result.c_str(), _cpp_result.size());")
        .expect("copy out");
    let terminator = body.find("_result[_cpp_result.size()] = '\\0';").expect("terminator");
    assert!(copy_in < call && call < alloc && alloc < copy_out && copy_out < terminator);
}

#[test]
fn test_enum_literals_and_case_labels() {
    let files = generate_from_xml(GEOMETRY).expect("Failed to generate");
    let h = &files.header.contents;
    let cpp = &files.source.contents;
    let cs = &files.bridge.contents;

    for (name, value) in [("RED", 3), ("GREEN", 1), ("BLUE", 42)] {
        assert!(h.contains(&format!("\tColor_{name} = {value},\n")));
        assert!(cs.contains(&format!("\tColor_{name} = {value},\n")));
        assert_eq!(cpp.matches(&format!("case ns::Color::{name}:")).count(), 1);
        assert_eq!(cpp.matches(&format!("case Color_{name}:")).count(), 1);
        assert_eq!(cs.matches(&format!("case Color.{name}:")).count(), 1);
        assert_eq!(cs.matches(&format!("case ns_Color.Color_{name}:")).count(), 1);
    }
}

#[test]
fn test_field_order_matches_across_outputs() {
    let files = generate_from_xml(GEOMETRY).expect("Failed to generate");
    let fields = ["name", "origin", "caption", "color", "width"];

    let h = &files.header.contents;
    let decl = &h[h.find("typedef struct _ns_Shape\n{").expect("decl")..];
    let positions: Vec<usize> = fields
        .iter()
        .map(|f| decl.find(&format!(" {f};")).expect("header field"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let cs = &files.bridge.contents;
    let mirror = &cs[cs.find("internal struct ns_Shape").expect("mirror")..];
    let positions: Vec<usize> = fields
        .iter()
        .map(|f| mirror.find(&format!(" {f};")).expect("mirror field"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let cpp = &files.source.contents;
    let free = &cpp[cpp.find("void ns_Shape_free_memory").expect("free")..];
    let name = free.find("ns_string_free_memory(value->name);").expect("name");
    let text = free
        .find("ns_string_free_memory(value->caption.text);")
        .expect("text");
    let font = free
        .find("ns_string_free_memory(value->caption.font);")
        .expect("font");
    let block = free.find("free(value);").expect("block");
    assert!(name < text && text < font && font < block);
}

#[test]
fn test_typedefs_map_like_their_target() {
    let files = generate_from_xml(GEOMETRY).expect("Failed to generate");
    let h = &files.header.contents;

    assert!(h.contains("\tint32_t width;\n"));
    assert!(h.contains("ns_Point* ns_svc_move(ns_Point p,\n"));
    assert!(h.contains("int32_t dx);\n"));
    assert!(!h.contains("Distance"));
    assert!(!h.contains("Coord"));
    assert!(files.bridge.contents.contains("\tpublic int width;\n"));
}

#[test]
fn test_one_free_function_per_struct() {
    let files = generate_from_xml(GEOMETRY).expect("Failed to generate");
    let cpp = &files.source.contents;

    for name in ["Point", "Shape", "Caption"] {
        let definition = format!("void ns_{name}_free_memory(ns_{name}* value)\n");
        assert_eq!(cpp.matches(&definition).count(), 1);
    }
    assert_eq!(cpp.matches("void ns_string_free_memory(char* value)\n").count(), 1);
}

#[test]
fn test_managed_wrapper() {
    let files = generate_from_xml(GEOMETRY).expect("Failed to generate");
    let cs = &files.bridge.contents;

    assert!(cs.contains("namespace Geometry.Interop\n{\n"));
    assert!(cs.contains("\t[StructLayout(LayoutKind.Sequential)]\n\tinternal struct ns_Point\n"));
    assert!(cs.contains("\t\tpublic class DirectClient\n"));
    assert!(cs.contains("[DllImport(\"Svc.dll\", CallingConvention = CallingConvention.Cdecl)]"));
    assert!(cs.contains("public Point move(Point p,\n"));
    assert!(cs.contains("ns_Point c_p = new ns_Point();"));
    assert!(cs.contains("c_p.x = p.X;"));
    assert!(cs.contains("c_shape.caption.text = shape.Caption.Text;"));
    assert!(cs.contains("/// <summary>\n\t\t/// Returns its input\n\t\t/// </summary>\n"));
}

#[test]
fn test_docs_can_be_disabled() {
    let options = GeneratorOptions::default().with_docs(false);
    let files = generate_from_xml_with_options(GEOMETRY, options).expect("Failed to generate");

    for file in files.files() {
        assert!(!file.contents.contains("Returns its input"));
        assert!(!file.contents.contains("Fill colors"));
    }
}

#[test]
fn test_container_argument_is_unsupported() {
    let xml = r#"<idl><document name="bad">
        <namespace name="cpp" value="ns"/>
        <service name="Svc">
            <method name="tags">
                <returns type="void"/>
                <arg field-id="1" name="values" type="list"><elemType type="string"/></arg>
            </method>
        </service>
    </document></idl>"#;

    match generate_from_xml(xml) {
        Err(CodegenError::Unsupported { what, context }) => {
            assert_eq!(what, "list<string>");
            assert_eq!(context, "Svc.tags");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("container argument must not generate"),
    }
}

#[test]
fn test_container_member_degrades_to_placeholder() {
    let xml = r#"<idl><document name="tags">
        <namespace name="cpp" value="ns"/>
        <struct name="Tagged">
            <field field-id="1" name="tags" type="set"><elemType type="string"/></field>
        </struct>
    </document></idl>"#;

    let files = generate_from_xml(xml).expect("Failed to generate");
    assert!(files.header.contents.contains("\tint tags;\n"));
    assert!(files.bridge.contents.contains("\tpublic int tags;\n"));
}

#[test]
fn test_validation_runs_before_generation() {
    let xml = r#"<idl><document name="dup">
        <struct name="S">
            <field field-id="1" name="a" type="i32"/>
            <field field-id="1" name="b" type="i32"/>
        </struct>
    </document></idl>"#;

    assert!(matches!(generate_from_xml(xml), Err(CodegenError::Schema(_))));
}

#[test]
fn test_write_to_is_conditional() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("gen");
    let files = generate_from_xml(GEOMETRY).expect("Failed to generate");

    let first = files.write_to(&out).expect("first write");
    assert_eq!(first.len(), 3);
    assert!(first.iter().all(|(_, status)| *status == WriteStatus::Created));
    assert!(out.join("geometry_api.h").exists());
    assert!(out.join("geometry_api.cpp").exists());
    assert!(out.join("geometry_api.cs").exists());

    let second = files.write_to(&out).expect("second write");
    assert!(second.iter().all(|(_, status)| *status == WriteStatus::Unchanged));
    assert!(files.stale_files(&out).expect("check").is_empty());

    let changed = generate_from_xml_with_options(
        GEOMETRY,
        GeneratorOptions::default().with_dll_name("geometry.dll"),
    )
    .expect("Failed to generate");
    let stale: Vec<&str> = changed
        .stale_files(&out)
        .expect("check")
        .into_iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(stale, ["geometry_api.cs"]);

    let third = changed.write_to(&out).expect("third write");
    assert_eq!(third[0].1, WriteStatus::Unchanged);
    assert_eq!(third[2].1, WriteStatus::Updated);
}

#[test]
fn test_generate_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("geometry.xml");
    std::fs::write(&path, GEOMETRY).expect("write schema");

    let files = generate_from_file(&path, GeneratorOptions::default()).expect("Failed to generate");
    assert_eq!(files.header.name, "geometry_api.h");
}

const TWO_SERVICES: &str = r#"<idl><document name="routes">
    <namespace name="cpp" value="ns"/>
    <namespace name="csharp" value="Routes.Interop"/>
    <struct name="Point">
      <field field-id="1" name="label" type="string"/>
      <field field-id="2" name="x" type="i32"/>
    </struct>
    <service name="Svc">
      <method name="move">
        <returns type="id" type-id="Point"/>
        <arg field-id="1" name="p" type="id" type-id="Point"/>
      </method>
    </service>
    <service name="Planner">
      <method name="start">
        <returns type="id" type-id="Point"/>
      </method>
      <method name="visit">
        <returns type="void"/>
        <arg field-id="1" name="p" type="id" type-id="Point"/>
      </method>
    </service>
</document></idl>"#;

#[test]
fn test_shared_struct_across_services_has_one_free_function() {
    let files = generate_from_xml(TWO_SERVICES).expect("Failed to generate");
    let h = &files.header.contents;
    let cpp = &files.source.contents;
    let cs = &files.bridge.contents;

    assert_eq!(h.matches("void ns_Point_free_memory(ns_Point* value);\n").count(), 1);
    assert_eq!(cpp.matches("void ns_Point_free_memory(ns_Point* value)\n{\n").count(), 1);
    assert_eq!(cpp.matches("void ns_string_free_memory(char* value)\n{\n").count(), 1);
    assert_eq!(cpp.matches("ns_string_free_memory(value->label);").count(), 1);

    assert!(cpp.contains("void init_service_ns_svc()\n"));
    assert!(cpp.contains("void init_service_ns_planner()\n"));
    assert!(cpp.contains("\tPlannerRegistry g_planner_registry;\n"));

    assert_eq!(cs.matches("public class DirectClient\n").count(), 2);
    assert!(cs.contains("\t}\n\n\tnamespace Planner\n\t{\n"));
    assert_eq!(
        cs.matches("private static extern void ns_Point_free_memory(IntPtr value);\n")
            .count(),
        2
    );
    assert_eq!(cs.matches("internal struct ns_Point\n").count(), 1);
}

#[test]
fn test_struct_nested_in_own_container_generates() {
    let xml = r#"<idl><document name="tree">
        <namespace name="cpp" value="ns"/>
        <struct name="Node">
            <field field-id="1" name="name" type="string"/>
            <field field-id="2" name="children" type="list">
                <elemType type="id" type-id="Node"/>
            </field>
        </struct>
        <service name="Svc">
            <method name="ping"><returns type="void"/></method>
        </service>
    </document></idl>"#;

    let files = generate_from_xml(xml).expect("Failed to generate");
    assert!(files.header.contents.contains("\tchar* name;\n\tint children;\n"));
    assert!(files.source.contents.contains("\tns_string_free_memory(value->name);\n"));
    assert!(files.bridge.contents.contains("\tpublic int children;\n"));
}

#[test]
fn test_argument_names_shadowing_body_locals_still_generate() {
    let xml = r#"<idl><document name="names">
        <namespace name="cpp" value="ns"/>
        <service name="Svc">
            <method name="setHandler">
                <returns type="void"/>
                <arg field-id="1" name="handler" type="i32"/>
            </method>
            <method name="get">
                <returns type="string"/>
                <arg field-id="1" name="result" type="string"/>
            </method>
        </service>
    </document></idl>"#;

    let files = generate_from_xml(xml).expect("Failed to generate");
    let cpp = &files.source.contents;
    assert!(cpp.contains("void ns_svc_set_handler(int32_t handler)\n{\n\tns::SvcHandler* _handler = "));
    assert!(cpp.contains("char* ns_svc_get(char* result)\n{\n"));
    assert!(cpp.contains("\tcpp_result = std::string(result);\n"));
    assert!(cpp.contains("\t_handler->get(_cpp_result,\n"));
    assert!(!cpp.contains("char* result;"));
}
