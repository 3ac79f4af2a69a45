// SPDX-License-Identifier: MPL-2.0
//! Commentary panel layout.

use super::component::{Message, State};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, column, container, scrollable, text, Column};
use iced::{Element, Length};

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
}

pub fn view<'a>(ctx: ViewContext<'a>, state: &'a State) -> Element<'a, Message> {
    let i18n = ctx.i18n;
    let mut content = Column::new()
        .spacing(spacing::LG)
        .padding(spacing::LG)
        .max_width(1200.0)
        .push(text(i18n.tr("commentary-title")).size(typography::TITLE_MD));

    if let Some(current) = state.current() {
        let label = if state.is_speaking() {
            i18n.tr("commentary-speaking")
        } else {
            i18n.tr("commentary-speak-button")
        };
        let speak = button(text(label).size(typography::BODY))
            .padding([spacing::XS, spacing::MD])
            .height(sizing::BUTTON_HEIGHT)
            .style(styles::button::primary)
            .on_press_maybe((!state.is_speaking()).then_some(Message::Speak));

        let card = column![
            text(i18n.tr("commentary-current-heading")).size(typography::BODY),
            text(current.commentary.as_str()).size(typography::BODY),
            speak,
        ]
        .spacing(spacing::SM);

        content = content.push(
            container(card)
                .width(Length::Fill)
                .padding(spacing::MD)
                .style(styles::container::panel),
        );
    }

    let heading = column![
        text(i18n.tr("commentary-feed-heading")).size(typography::TITLE_MD),
        text(i18n.tr_with_args(
            "commentary-feed-count",
            &[("count", state.feed().len().into())],
        ))
        .size(typography::CAPTION),
    ]
    .spacing(spacing::XXS);
    content = content.push(heading);

    let rows: Element<'a, Message> = if state.feed().is_empty() {
        text(i18n.tr("commentary-feed-empty"))
            .size(typography::BODY)
            .into()
    } else {
        let list = state.feed_lines().into_iter().enumerate().fold(
            Column::new().spacing(spacing::XXS),
            |list, (index, line)| {
                let style = if state.current_index() == Some(index) {
                    styles::button::selected
                } else {
                    styles::button::unselected
                };
                list.push(
                    button(text(line).size(typography::BODY))
                        .width(Length::Fill)
                        .padding([spacing::XXS, spacing::XS])
                        .style(style)
                        .on_press(Message::Select(index)),
                )
            },
        );
        scrollable(list).into()
    };

    content = content.push(
        container(rows)
            .width(Length::Fill)
            .max_height(sizing::FEED_MAX_HEIGHT)
            .padding(spacing::MD)
            .style(styles::container::panel),
    );

    container(content).center_x(Length::Fill).into()
}
