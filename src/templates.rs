//! Generated infrastructure files of the virtual project.
//!
//! The entry shell picks the renderable export of the usage file at runtime,
//! wires the Tailwind CDN build to the theme variables, and toggles the `dark`
//! class on the document root. It never throws when nothing renderable is
//! exported; it shows an inline message instead.

use std::fmt::Write;

/// Message rendered inside the preview when the usage file exports nothing callable.
pub const NO_EXPORT_MESSAGE: &str =
    "Could not find a component to render. Please export a component from your preview code.";

/// Palette tokens exposed to Tailwind as `var(--token)` colours.
const COLOR_TOKENS: &[&str] = &[
    "background",
    "foreground",
    "card",
    "card-foreground",
    "popover",
    "popover-foreground",
    "primary",
    "primary-foreground",
    "secondary",
    "secondary-foreground",
    "muted",
    "muted-foreground",
    "accent",
    "accent-foreground",
    "destructive",
    "destructive-foreground",
    "border",
    "input",
    "ring",
    "sidebar",
    "sidebar-foreground",
    "sidebar-primary",
    "sidebar-primary-foreground",
    "sidebar-accent",
    "sidebar-accent-foreground",
    "sidebar-border",
    "sidebar-ring",
    "chart-1",
    "chart-2",
    "chart-3",
    "chart-4",
    "chart-5",
];

const RADIUS_SCALE: &[(&str, &str)] = &[
    ("xs", "calc(var(--radius) - 6px)"),
    ("sm", "calc(var(--radius) - 4px)"),
    ("md", "calc(var(--radius) - 2px)"),
    ("lg", "var(--radius)"),
    ("xl", "calc(var(--radius) + 4px)"),
];

const SHADOW_SCALE: &[(&str, &str)] = &[
    ("\"2xs\"", "var(--shadow-2xs)"),
    ("xs", "var(--shadow-xs)"),
    ("sm", "var(--shadow-sm)"),
    ("DEFAULT", "var(--shadow)"),
    ("md", "var(--shadow-md)"),
    ("lg", "var(--shadow-lg)"),
    ("xl", "var(--shadow-xl)"),
    ("\"2xl\"", "var(--shadow-2xl)"),
];

const TRACKING_SCALE: &[(&str, &str)] = &[
    ("tighter", "-0.05em"),
    ("tight", "-0.025em"),
    ("normal", "0em"),
    ("wide", "0.025em"),
    ("wider", "0.05em"),
    ("widest", "0.1em"),
];

/// Multipliers of `--spacing` exposed as spacing utilities.
const SPACING_STEPS: &[&str] = &[
    "0.5", "1", "1.5", "2", "2.5", "3", "3.5", "4", "5", "6", "7", "8", "9", "10", "11", "12",
    "14", "16", "20", "24", "28", "32", "36", "40", "44", "48", "52", "56", "60", "64", "72",
    "80", "96",
];

/// Class-name merge helper imported by components as `@/lib/utils`.
pub const UTILS_SOURCE: &str = r#"import { type ClassValue, clsx } from "clsx";
import { twMerge } from "tailwind-merge";

export function cn(...inputs: ClassValue[]) {
  return twMerge(clsx(inputs));
}
"#;

/// Type-checker configuration: `@/` path alias and relaxed diagnostics.
pub const TSCONFIG_SOURCE: &str = r#"{
  "compilerOptions": {
    "target": "ESNext",
    "module": "ESNext",
    "moduleResolution": "bundler",
    "jsx": "react-jsx",
    "baseUrl": ".",
    "paths": {
      "@/*": ["./*"]
    },
    "lib": ["dom", "dom.iterable", "esnext"],
    "allowJs": true,
    "skipLibCheck": true,
    "strict": false,
    "noEmit": true,
    "esModuleInterop": true,
    "resolveJsonModule": true,
    "isolatedModules": true
  },
  "include": ["**/*.ts", "**/*.tsx"]
}
"#;

fn tailwind_config() -> String {
    let mut out = String::with_capacity(4096);
    out.push_str("{\n  darkMode: \"class\",\n  theme: {\n    extend: {\n      colors: {\n");
    for token in COLOR_TOKENS {
        let _ = writeln!(out, "        \"{}\": \"var(--{})\",", token, token);
    }
    out.push_str("      },\n      borderRadius: {\n");
    for (key, value) in RADIUS_SCALE {
        let _ = writeln!(out, "        {}: \"{}\",", key, value);
    }
    out.push_str("      },\n      boxShadow: {\n");
    for (key, value) in SHADOW_SCALE {
        let _ = writeln!(out, "        {}: \"{}\",", key, value);
    }
    out.push_str("      },\n      fontFamily: {\n");
    out.push_str("        sans: \"var(--font-sans, ui-sans-serif, system-ui)\",\n");
    out.push_str("        mono: \"var(--font-mono, ui-monospace, SFMono-Regular, Menlo)\",\n");
    out.push_str("        serif: \"var(--font-serif, ui-serif, Georgia)\",\n");
    out.push_str("      },\n      letterSpacing: {\n");
    for (key, fallback) in TRACKING_SCALE {
        let _ = writeln!(out, "        {}: \"var(--tracking-{}, {})\",", key, key, fallback);
    }
    out.push_str("      },\n      spacing: {\n        px: \"1px\",\n        0: \"0\",\n");
    for step in SPACING_STEPS {
        if *step == "1" {
            out.push_str("        1: \"var(--spacing, 0.25rem)\",\n");
        } else {
            let _ = writeln!(out, "        {}: \"calc(var(--spacing, 0.25rem) * {})\",", step, step);
        }
    }
    out.push_str("      },\n    },\n  },\n}");
    out
}

/// Source of the hidden entry shell for the given colour mode.
///
/// The output depends only on `dark`, so re-assembly with the same mode
/// produces identical text.
pub fn entry_shell(dark: bool) -> String {
    let mut out = String::with_capacity(8192);
    out.push_str(
        "import React, { useEffect, useLayoutEffect } from \"react\";\n\
         import * as Preview from \"./Preview\";\n\
         import { cn } from \"@/lib/utils\";\n\
         import \"./styles/globals.css\";\n\n",
    );

    out.push_str("const TAILWIND_CONFIG = ");
    out.push_str(&tailwind_config());
    out.push_str(";\n\n");

    out.push_str(
        "const configureTailwind = () => {\n\
         \x20 if (typeof window === \"undefined\") return;\n\
         \x20 const apply = () => {\n\
         \x20   if (typeof window.tailwind === \"undefined\") return false;\n\
         \x20   window.tailwind.config = TAILWIND_CONFIG;\n\
         \x20   return true;\n\
         \x20 };\n\
         \x20 if (apply()) return;\n\
         \x20 const interval = setInterval(() => {\n\
         \x20   if (apply()) clearInterval(interval);\n\
         \x20 }, 50);\n\
         \x20 setTimeout(() => clearInterval(interval), 5000);\n\
         };\n\n",
    );

    out.push_str(
        "const pickComponent = (mod) => {\n\
         \x20 if (mod.default) return mod.default;\n\
         \x20 return Object.values(mod).find((value) => typeof value === \"function\");\n\
         };\n\n",
    );

    let _ = write!(
        out,
        "export default function App() {{\n  const isDark = {dark};\n\n",
        dark = dark
    );
    out.push_str(
        "  useLayoutEffect(() => {\n\
         \x20   document.documentElement.classList.toggle(\"dark\", isDark);\n\
         \x20 }, [isDark]);\n\n\
         \x20 useEffect(() => {\n\
         \x20   configureTailwind();\n\
         \x20 }, []);\n\n\
         \x20 const Component = pickComponent(Preview);\n\n\
         \x20 if (!Component) {\n\
         \x20   return (\n\
         \x20     <div className=\"p-4 text-red-500\">\n",
    );
    let _ = writeln!(out, "        {}", NO_EXPORT_MESSAGE);
    out.push_str(
        "      </div>\n\
         \x20   );\n\
         \x20 }\n\n\
         \x20 return (\n\
         \x20   <div className={cn(\"w-full h-full flex items-center justify-center p-4\", \"bg-background text-foreground\")}>\n\
         \x20     <Component />\n\
         \x20   </div>\n\
         \x20 );\n\
         }\n",
    );
    out
}
