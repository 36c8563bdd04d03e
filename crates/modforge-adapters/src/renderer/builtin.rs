//! Templates that ship with modforge.
//!
//! Names match the layout produced by
//! `modforge_core::application::services::module_layout`. A line holding a
//! `{{@key}}` tag is emitted once per item of the list `key`.

pub const PACKAGE_MANIFEST: &str = r#"// swift-tools-version:{{swiftToolsVersion}}
// Generated by modforge on {{timestamp}}

import PackageDescription

let package = Package(
    name: "{{name}}",
    platforms: [
        {{@platforms}},
    ],
    products: [
        .library(name: "{{name}}", targets: ["{{name}}"]),
        .library(name: "{{interfaceName}}", targets: ["{{interfaceName}}"]),
    ],
    dependencies: [
        {{@packageDependencies}},
    ],
    targets: [
        .target(name: "{{interfaceName}}"),
        .target(
            name: "{{name}}",
            dependencies: [
                {{@targetDependencies}},
            ]
        ),
        .testTarget(name: "{{testsName}}", dependencies: ["{{name}}"]),
    ]
)
"#;

pub const README: &str = r#"# {{name}}

{{name}} is a {{moduleKind}} module maintained by {{author}} at {{organizationName}}.

## Layout

- `Sources/{{name}}`: implementation
- `Sources/{{interfaceName}}`: public protocols other modules depend on
- `Tests/{{testsName}}`: unit tests

Bundle identifier prefix: `{{bundleIdentifier}}`

Copyright {{year}} {{organizationName}}
"#;

pub const GITIGNORE: &str = r#".DS_Store
/.build
/Packages
.swiftpm/
xcuserdata/
DerivedData/
"#;

pub const MODULE_SOURCE: &str = r#"//
//  {{name}}.swift
//  {{name}}
//
//  Created by {{author}} on {{timestamp}}.
//  Copyright {{year}} {{organizationName}}. All rights reserved.
//

import Foundation
import {{interfaceName}}

public final class {{name}}: {{name}}Providing {
    public init() {}
}
"#;

pub const INTERFACE_SOURCE: &str = r#"//
//  {{interfaceName}}.swift
//  {{name}}
//

/// Public surface of {{name}}. Depend on this target, not on {{name}} itself.
public protocol {{name}}Providing: AnyObject {}
"#;

pub const TESTS_SOURCE: &str = r#"import XCTest
@testable import {{name}}

final class {{testsName}}: XCTestCase {
    func testInitialization() {
        XCTAssertNotNil({{name}}())
    }
}
"#;

pub const EXAMPLE_APP: &str = r#"import SwiftUI
import {{name}}

@main
struct {{name}}ExampleApp: App {
    var body: some Scene {
        WindowGroup {
            Text("{{name}}")
        }
    }
}
"#;

/// Every built-in template as `(name, source)`.
pub fn all() -> [(&'static str, &'static str); 7] {
    [
        ("Package.swift", PACKAGE_MANIFEST),
        ("README.md", README),
        ("gitignore", GITIGNORE),
        ("Module.swift", MODULE_SOURCE),
        ("Interface.swift", INTERFACE_SOURCE),
        ("Tests.swift", TESTS_SOURCE),
        ("ExampleApp.swift", EXAMPLE_APP),
    ]
}
