/// Elements the renderer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Heading(u8),
    Pre,
    Strong,
    Em,
    Code,
    Link,
    Blockquote,
    Rule,
    List,
    ListItem,
    Paragraph,
}

impl Element {
    pub fn tag(&self) -> &'static str {
        match self {
            Element::Heading(1) => "h1",
            Element::Heading(2) => "h2",
            Element::Heading(3) => "h3",
            Element::Heading(_) => "h4",
            Element::Pre => "pre",
            Element::Strong => "strong",
            Element::Em => "em",
            Element::Code => "code",
            Element::Link => "a",
            Element::Blockquote => "blockquote",
            Element::Rule => "hr",
            Element::List => "ul",
            Element::ListItem => "li",
            Element::Paragraph => "p",
        }
    }
}

/// Class attributes attached to rendered elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Bare tags, no class attributes.
    #[default]
    Plain,
    /// Utility classes matching the directory's web styling.
    Styled,
}

impl Theme {
    pub fn class(&self, element: Element) -> Option<&'static str> {
        if *self == Theme::Plain {
            return None;
        }

        Some(match element {
            Element::Heading(1) => "text-2xl font-bold text-gray-900 mb-6 pb-3 border-b-2 border-gray-300",
            Element::Heading(2) => "text-xl font-bold text-gray-900 mt-8 mb-4 pb-2 border-b border-gray-200",
            Element::Heading(3) => "text-lg font-semibold text-gray-900 mt-6 mb-3",
            Element::Heading(_) => "text-base font-semibold text-gray-900 mt-4 mb-2",
            Element::Pre => {
                "bg-gray-900 text-gray-100 px-4 py-3 rounded-lg overflow-x-auto my-4 text-sm border border-gray-700"
            }
            Element::Strong => "font-semibold text-gray-900",
            Element::Em => "italic",
            Element::Code => "bg-gray-100 text-red-600 px-1.5 py-0.5 rounded text-sm font-mono whitespace-nowrap",
            Element::Link => "text-blue-600 hover:text-blue-800 underline",
            Element::Blockquote => "border-l-4 border-gray-300 pl-4 py-2 my-4 text-gray-600 italic",
            Element::Rule => "my-6 border-t border-gray-200",
            Element::List => "list-disc list-outside my-3 text-gray-700 space-y-1",
            Element::ListItem => "ml-5 mb-1",
            Element::Paragraph => "text-gray-700 leading-relaxed mb-3",
        })
    }

    /// Opening tag, with extra attributes appended verbatim.
    pub fn open(&self, element: Element, attrs: &str) -> String {
        let class = self
            .class(element)
            .map(|c| format!(r#" class="{}""#, c))
            .unwrap_or_default();
        format!("<{}{}{}>", element.tag(), attrs, class)
    }

    pub fn close(&self, element: Element) -> String {
        format!("</{}>", element.tag())
    }

    pub fn wrap(&self, element: Element, inner: &str) -> String {
        format!("{}{}{}", self.open(element, ""), inner, self.close(element))
    }

    pub fn rule(&self) -> String {
        match self.class(Element::Rule) {
            Some(class) => format!(r#"<hr class="{}" />"#, class),
            None => "<hr />".to_string(),
        }
    }
}
