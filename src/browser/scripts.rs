//! Page-side functions. Selectors are passed in as arguments so every
//! selector lives in [`crate::selectors`].

use super::driver::Script;

/// `(labelSelector, selectedDaySelector) -> { label, day }`, either may be null.
pub const READ_CALENDAR: Script = Script {
    name: "read_calendar",
    source: r#"(labelSel, daySel) => {
        const text = (sel) => {
            const el = document.querySelector(sel);
            return el ? el.innerText.trim() : null;
        };
        return { label: text(labelSel), day: text(daySel) };
    }"#,
};

/// `(cellSelector, day) -> index | null` of the cell whose text is `day`.
pub const FIND_DAY_CELL: Script = Script {
    name: "find_day_cell",
    source: r#"(cellSel, day) => {
        const cells = Array.from(document.querySelectorAll(cellSel));
        const index = cells.findIndex((el) => el.innerText.trim() === String(day));
        return index < 0 ? null : index;
    }"#,
};

/// `(rowSelector) -> bool`, true while the servings table shows its placeholder.
pub const SERVINGS_LOADING: Script = Script {
    name: "servings_loading",
    source: r#"(rowSel) => {
        const tr = document.querySelector(rowSel);
        return !!tr && tr.innerText.trim() === 'Loading...';
    }"#,
};

/// `(rowSelector) -> string[][]`, trimmed cell texts per row.
pub const READ_SERVINGS: Script = Script {
    name: "read_servings",
    source: r#"(rowSel) => Array.from(document.querySelectorAll(rowSel)).map((tr) =>
        Array.from(tr.querySelectorAll('td')).map((td) => td.innerText.trim())
    )"#,
};

/// `(selector) -> bool`, whether an element was removed.
pub const REMOVE_ELEMENT: Script = Script {
    name: "remove_element",
    source: r#"(sel) => {
        const el = document.querySelector(sel);
        if (!el || !el.parentElement) return false;
        el.parentElement.removeChild(el);
        return true;
    }"#,
};

pub const BODY_MARKUP: Script = Script {
    name: "body_markup",
    source: r#"() => document.body.innerHTML"#,
};
